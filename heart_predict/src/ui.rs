//! A renderer-agnostic description of one screen. render() builds a fresh
//! tree on every state change; nothing here is retained between calls.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    LightBlue,
    DarkBlue,
    Green,
    Yellow,
    Red,
}

/// A colored stretch of a gauge axis, `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub start: f64,
    pub end: f64,
    pub color: Color,
}

impl Band {
    pub fn new(start: f64, end: f64, color: Color) -> Band {
        Band { start, end, color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub title: String,
    pub value: f64,
    pub axis: (f64, f64),
    /// The delta shown above the number is measured against this.
    pub reference: f64,
    /// Frame and threshold marker; also fills the bar when the value is off the axis.
    pub bar_color: Color,
    /// Where the marker line is drawn across the bands.
    pub threshold: f64,
    pub bands: Vec<Band>,
}

impl Gauge {
    pub fn delta(&self) -> f64 {
        self.value - self.reference
    }

    /// Color of the band the value falls in.
    pub fn band_color(&self) -> Option<Color> {
        self.color_at(self.value)
    }

    /// Color of the band holding `at`. The last band also owns its upper
    /// edge; points off the axis have no band.
    pub fn color_at(&self, at: f64) -> Option<Color> {
        let last = self.bands.len().checked_sub(1)?;
        self.bands
            .iter()
            .enumerate()
            .find(|(i, band)| at >= band.start && (at < band.end || (*i == last && at <= band.end)))
            .map(|(_, band)| band.color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<Bar>,
    /// Whether the y axis (and so each bar's value) is worth showing.
    pub show_values: bool,
}

impl BarChart {
    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|bar| bar.label.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Title(String),
    Heading(String),
    Text(String),
    Info(String),
    Expander { title: String, items: Vec<String> },
    Field { label: String, value: String, bounds: String },
    Prediction(String),
    Gauge(Gauge),
    BarChart(BarChart),
    Metrics(Vec<Metric>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ui {
    pub sidebar: Vec<Node>,
    pub main: Vec<Node>,
}

impl Ui {
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.sidebar.iter().chain(self.main.iter())
    }

    /// Number of gauges and bar charts on screen.
    pub fn charts(&self) -> usize {
        self.nodes()
            .filter(|node| matches!(node, Node::Gauge(_) | Node::BarChart(_)))
            .count()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.nodes()
            .filter_map(|node| match node {
                Node::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.nodes()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn prediction(&self) -> Option<&str> {
        self.nodes().find_map(|node| match node {
            Node::Prediction(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn gauge(&self, title: &str) -> Option<&Gauge> {
        self.nodes().find_map(|node| match node {
            Node::Gauge(gauge) if gauge.title == title => Some(gauge),
            _ => None,
        })
    }

    pub fn bar_chart(&self, title: &str) -> Option<&BarChart> {
        self.nodes().find_map(|node| match node {
            Node::BarChart(chart) if chart.title == title => Some(chart),
            _ => None,
        })
    }
}
