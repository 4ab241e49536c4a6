//! Configuration for SVG rendering

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Padding around the canvas in the viewBox
    pub padding: f64,

    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names and generated ids (e.g., "pl-" for "pl-box")
    pub class_prefix: Option<String>,

    /// Whether to paint the canvas color and the long-article content frame
    pub paint_background: bool,

    /// Opacity for nodes marked invisible. `None` leaves them out.
    pub hidden_opacity: Option<f64>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            padding: 0.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("pl-".to_string()),
            paint_background: true,
            hidden_opacity: None,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Leave out the canvas and content frame fills, e.g. for a transparent
    /// thumbnail placed over an editor's own backdrop
    pub fn with_background(mut self, paint: bool) -> Self {
        self.paint_background = paint;
        self
    }

    /// Paint invisible nodes faded to `opacity` instead of skipping them.
    /// The value is clamped to `0..=1`.
    pub fn with_hidden_opacity(mut self, opacity: f64) -> Self {
        self.hidden_opacity = opacity.is_finite().then(|| opacity.clamp(0.0, 1.0));
        self
    }
}
