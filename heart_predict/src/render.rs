
use crate::metrics::{
    bmi, health_days, risk_factors, BmiCategory, NORMAL_BMI, RECOMMENDED_SLEEP_HOURS,
};
use crate::profile::{Field, HealthProfile};
use crate::session::{Outcome, Session};
use crate::ui::{Band, Bar, BarChart, Color, Gauge, Metric, Node, Ui};

pub const APP_TITLE: &str = "Heart Disease Prediction App";
pub const NO_RISK_FACTORS: &str = "No risk factors selected.";
pub const HEALTH_DAYS_TITLE: &str = "Physical and Mental Health Days in the Last Month";
pub const RISK_FACTORS_TITLE: &str = "Present Risk Factors";
pub const ABOUT: &str =
    "This app predicts the likelihood of heart disease based on various health factors.";

/// Lays out the whole screen for the current session state.
pub fn render(session: &Session) -> Ui {
    let profile = session.profile();
    let mut ui = Ui::default();

    ui.sidebar.push(Node::Heading(String::from("Input Parameters")));
    for field in Field::ALL {
        ui.sidebar.push(Node::Field {
            label: String::from(field.label()),
            value: profile.get(field),
            bounds: field.bounds().to_string(),
        });
    }

    ui.main.push(Node::Title(String::from(APP_TITLE)));
    ui.main.push(Node::Expander {
        title: String::from("Variable Descriptions"),
        items: Field::ALL
            .iter()
            .map(|field| format!("{}: {}", field.label(), field.description()))
            .collect(),
    });

    match session.outcome() {
        None => return ui,
        Some(Outcome::Success { prediction }) => render_insights(&mut ui.main, profile, prediction),
        Some(Outcome::Failure { message }) => ui.main.push(Node::Error(message.clone())),
    }

    ui.sidebar.push(Node::Heading(String::from("About")));
    ui.sidebar.push(Node::Info(String::from(ABOUT)));
    ui
}

fn render_insights(main: &mut Vec<Node>, profile: &HealthProfile, prediction: &str) {
    main.push(Node::Heading(String::from("Prediction Result")));
    main.push(Node::Prediction(String::from(prediction)));

    main.push(Node::Heading(String::from("Health Insights")));

    let bmi = bmi(profile.weight, profile.height);
    main.push(Node::Gauge(bmi_gauge(bmi)));
    main.push(Node::Text(format!(
        "You seem to be in the {} BMI Category",
        BmiCategory::from_bmi(bmi)
    )));
    main.push(Node::Text(String::from("BMI is:")));
    main.push(Node::Metrics(vec![
        Metric {
            label: String::new(),
            value: format!("{:.1}", bmi),
            delta: Some(format!("{:.1}", bmi - NORMAL_BMI)),
        },
        Metric {
            label: String::from("Normal BMI"),
            value: format!("{:.1}", NORMAL_BMI),
            delta: None,
        },
    ]));

    main.push(Node::Gauge(sleep_gauge(profile.sleep_hours as f64)));
    main.push(Node::BarChart(health_days_chart(profile)));
    main.push(risk_factors_node(profile));
}

pub fn bmi_gauge(bmi: f64) -> Gauge {
    Gauge {
        title: String::from("BMI"),
        value: bmi,
        axis: (0.0, 40.0),
        reference: NORMAL_BMI,
        bar_color: Color::DarkBlue,
        threshold: bmi,
        bands: vec![
            Band::new(0.0, 18.5, Color::LightBlue),
            Band::new(18.5, 25.0, Color::Green),
            Band::new(25.0, 30.0, Color::Yellow),
            Band::new(30.0, 40.0, Color::Red),
        ],
    }
}

pub fn sleep_gauge(hours: f64) -> Gauge {
    Gauge {
        title: String::from("Sleep Hours"),
        value: hours,
        axis: (0.0, 12.0),
        reference: RECOMMENDED_SLEEP_HOURS,
        bar_color: Color::DarkBlue,
        threshold: hours,
        bands: vec![
            Band::new(0.0, 6.0, Color::Red),
            Band::new(6.0, 7.0, Color::Yellow),
            Band::new(7.0, 9.0, Color::Green),
            Band::new(9.0, 12.0, Color::Yellow),
        ],
    }
}

pub fn health_days_chart(profile: &HealthProfile) -> BarChart {
    BarChart {
        title: String::from(HEALTH_DAYS_TITLE),
        bars: health_days(profile)
            .into_iter()
            .map(|(label, days)| Bar {
                label: String::from(label),
                value: days as f64,
            })
            .collect(),
        show_values: true,
    }
}

/// One constant-height bar per present risk factor, or a notice when
/// there are none.
pub fn risk_factors_node(profile: &HealthProfile) -> Node {
    let factors = risk_factors(profile);
    if factors.is_empty() {
        return Node::Text(String::from(NO_RISK_FACTORS));
    }
    Node::BarChart(BarChart {
        title: String::from(RISK_FACTORS_TITLE),
        bars: factors
            .into_iter()
            .map(|label| Bar {
                label: String::from(label),
                value: 1.0,
            })
            .collect(),
        show_values: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_shows_form_only() {
        let ui = render(&Session::new());
        assert_eq!(ui.charts(), 0);
        assert!(ui.errors().is_empty());
        assert!(ui.prediction().is_none());
        let fields = ui
            .sidebar
            .iter()
            .filter(|node| matches!(node, Node::Field { .. }))
            .count();
        assert_eq!(fields, 16);
        assert!(!ui.sidebar.contains(&Node::Info(String::from(ABOUT))));
    }

    #[test]
    fn bmi_gauge_bands_and_reference() {
        let gauge = bmi_gauge(bmi(81.0, 1.8));
        assert_eq!(gauge.axis, (0.0, 40.0));
        assert_eq!(gauge.reference, 25.0);
        assert!(gauge.delta().abs() < 1e-6);
        let edges: Vec<f64> = gauge.bands.iter().map(|band| band.end).collect();
        assert_eq!(edges, vec![18.5, 25.0, 30.0, 40.0]);
    }

    #[test]
    fn sleep_gauge_colors() {
        assert_eq!(sleep_gauge(4.0).band_color(), Some(Color::Red));
        assert_eq!(sleep_gauge(6.5).band_color(), Some(Color::Yellow));
        assert_eq!(sleep_gauge(8.0).band_color(), Some(Color::Green));
        assert_eq!(sleep_gauge(10.0).band_color(), Some(Color::Yellow));
        assert_eq!(sleep_gauge(8.0).reference, 8.0);
    }

    #[test]
    fn gauges_draw_dark_bar_with_marker_at_value() {
        for gauge in [bmi_gauge(27.3), sleep_gauge(6.0)] {
            assert_eq!(gauge.bar_color, Color::DarkBlue);
            assert_eq!(gauge.threshold, gauge.value);
        }
    }

    #[test]
    fn no_flags_renders_notice_not_chart() {
        let node = risk_factors_node(&HealthProfile::default());
        assert_eq!(node, Node::Text(String::from(NO_RISK_FACTORS)));
    }

    #[test]
    fn two_flags_render_two_bars() {
        let profile = HealthProfile {
            alcohol_drinkers: true,
            had_diabetes: true,
            ..Default::default()
        };
        match risk_factors_node(&profile) {
            Node::BarChart(chart) => {
                assert_eq!(chart.labels(), vec!["Alcohol Drinker", "Diabetes"]);
                assert!(chart.bars.iter().all(|bar| bar.value == 1.0));
                assert!(!chart.show_values);
            }
            other => panic!("expected a bar chart, got {:?}", other),
        }
    }

    #[test]
    fn health_days_chart_has_four_bars() {
        let profile = HealthProfile {
            physical_health_days: 25,
            mental_health_days: 10,
            ..Default::default()
        };
        let chart = health_days_chart(&profile);
        let values: Vec<f64> = chart.bars.iter().map(|bar| bar.value).collect();
        assert_eq!(values, vec![25.0, 5.0, 10.0, 20.0]);
    }
}
