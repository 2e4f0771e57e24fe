//! Constants shared by the diagram pipeline.

use std::time::Duration;

/// Class of the placeholder element the converter emits for a diagram fence.
pub const PLACEHOLDER_CLASS: &str = "mermaid-container";

/// Placeholder attribute carrying the raw diagram source.
pub const SOURCE_ATTR: &str = "data-mermaid-source";

/// Text left in place of a diagram that failed to render.
pub const ERROR_MARKER: &str = "[Error rendering Mermaid diagram]";

/// Default diagram tool executable, looked up on `PATH`.
pub const DEFAULT_COMMAND: &str = "mmdc";

/// Default visual theme passed to the diagram tool.
pub const DEFAULT_THEME: &str = "neutral";

/// Default background color passed to the diagram tool.
pub const DEFAULT_BACKGROUND: &str = "white";

/// Default scale factor passed to the diagram tool.
pub const DEFAULT_SCALE: u32 = 2;

/// Name of the tool configuration file, rewritten on every render.
pub const CONFIG_FILENAME: &str = "mermaid-config.json";

/// Text color forced through the tool configuration.
pub const TEXT_COLOR: &str = "#333333";

/// Line color forced through the tool configuration.
pub const LINE_COLOR: &str = "#666666";

/// Poll interval while waiting on a render with a timeout.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
