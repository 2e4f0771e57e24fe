//! Diagram rendering through the Mermaid command-line tool.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{
    CONFIG_FILENAME, DEFAULT_BACKGROUND, DEFAULT_COMMAND, DEFAULT_SCALE, DEFAULT_THEME, LINE_COLOR,
    POLL_INTERVAL, TEXT_COLOR,
};
use crate::error::RenderError;
use crate::renderer::DiagramRenderer;

/// [`DiagramRenderer`] that runs `mmdc` once per diagram.
///
/// Invocation: `mmdc -i <in.mmd> -o <out.svg> -t <theme> -b <background>
/// --scale <n> -c <work_dir>/mermaid-config.json`. Scratch source and output
/// files live in the work directory and are removed after each render.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    command: String,
    work_dir: PathBuf,
    theme: String,
    background: String,
    scale: u32,
    timeout: Option<Duration>,
}

impl MermaidCli {
    /// Create a renderer that keeps its scratch files in `work_dir`.
    #[must_use]
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: DEFAULT_COMMAND.to_owned(),
            work_dir: work_dir.into(),
            theme: DEFAULT_THEME.to_owned(),
            background: DEFAULT_BACKGROUND.to_owned(),
            scale: DEFAULT_SCALE,
            timeout: None,
        }
    }

    /// Set the executable to run (default: `mmdc`).
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the visual theme (default: `neutral`).
    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the background color (default: `white`).
    #[must_use]
    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Set the scale factor (default: 2).
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Kill renders that run longer than `timeout`. No limit by default.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory holding the tool configuration and scratch files.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Write the tool configuration file and return its path.
    ///
    /// Rewritten on every render so a stale or hand-edited file never
    /// changes output.
    fn write_config(&self) -> Result<PathBuf, RenderError> {
        let config = serde_json::json!({
            "themeVariables": {
                "primaryTextColor": TEXT_COLOR,
                "secondaryTextColor": TEXT_COLOR,
                "tertiaryTextColor": TEXT_COLOR,
                "textColor": TEXT_COLOR,
                "lineColor": LINE_COLOR,
            },
            "mindmap": {
                "padding": 20,
            },
        });
        let path = self.work_dir.join(CONFIG_FILENAME);
        fs::write(&path, serde_json::to_string_pretty(&config)?)?;
        Ok(path)
    }

    fn run(&self, mut command: Command) -> Result<(), RenderError> {
        let mut stderr = tempfile::tempfile()?;
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr.try_clone()?));

        let mut child = command.spawn().map_err(|source| RenderError::Spawn {
            command: self.command.clone(),
            source,
        })?;
        let status = match self.timeout {
            Some(limit) => wait_with_timeout(&mut child, limit)?,
            None => child.wait()?,
        };

        if status.success() {
            return Ok(());
        }
        Err(RenderError::Exit {
            status,
            stderr: read_captured(&mut stderr)?,
        })
    }
}

impl DiagramRenderer for MermaidCli {
    fn render(&self, source: &str) -> Result<String, RenderError> {
        fs::create_dir_all(&self.work_dir)?;
        let config_path = self.write_config()?;

        let mut input = tempfile::Builder::new()
            .prefix("diagram-")
            .suffix(".mmd")
            .tempfile_in(&self.work_dir)?;
        input.write_all(source.as_bytes())?;
        input.flush()?;
        let output = tempfile::Builder::new()
            .prefix("diagram-")
            .suffix(".svg")
            .tempfile_in(&self.work_dir)?;

        let mut command = Command::new(&self.command);
        command
            .arg("-i")
            .arg(input.path())
            .arg("-o")
            .arg(output.path())
            .arg("-t")
            .arg(&self.theme)
            .arg("-b")
            .arg(&self.background)
            .arg("--scale")
            .arg(self.scale.to_string())
            .arg("-c")
            .arg(&config_path);

        tracing::debug!(command = %self.command, "Rendering diagram");
        self.run(command)?;

        // Some failures only show up as an empty output with exit code 0
        let svg = match fs::read_to_string(output.path()) {
            Ok(svg) => svg,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::MissingOutput);
            }
            Err(e) => return Err(e.into()),
        };
        if svg.trim().is_empty() {
            return Err(RenderError::MissingOutput);
        }
        Ok(svg)
    }
}

fn wait_with_timeout(child: &mut Child, limit: Duration) -> Result<ExitStatus, RenderError> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(RenderError::Timeout(limit));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn read_captured(file: &mut File) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).trim().to_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_builder_defaults() {
        let cli = MermaidCli::new("/tmp/diagrams");

        assert_eq!(cli.command, "mmdc");
        assert_eq!(cli.theme, "neutral");
        assert_eq!(cli.background, "white");
        assert_eq!(cli.scale, 2);
        assert_eq!(cli.timeout, None);
        assert_eq!(cli.work_dir(), Path::new("/tmp/diagrams"));
    }

    #[test]
    fn test_builder_overrides() {
        let cli = MermaidCli::new("/tmp/diagrams")
            .command("/opt/bin/mmdc")
            .theme("forest")
            .background("transparent")
            .scale(3)
            .timeout(Some(Duration::from_secs(30)));

        assert_eq!(cli.command, "/opt/bin/mmdc");
        assert_eq!(cli.theme, "forest");
        assert_eq!(cli.background, "transparent");
        assert_eq!(cli.scale, 3);
        assert_eq!(cli.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_write_config_forces_text_colors() {
        let dir = TempDir::new().unwrap();
        let cli = MermaidCli::new(dir.path());

        let path = cli.write_config().unwrap();
        let config: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(path, dir.path().join("mermaid-config.json"));
        assert_eq!(config["themeVariables"]["textColor"], "#333333");
        assert_eq!(config["themeVariables"]["primaryTextColor"], "#333333");
        assert_eq!(config["themeVariables"]["lineColor"], "#666666");
        assert_eq!(config["mindmap"]["padding"], 20);
    }

    #[test]
    fn test_missing_tool_is_spawn_error_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let cli = MermaidCli::new(dir.path()).command("folio-test-no-such-diagram-tool");

        let result = cli.render("graph TD; A-->B");

        assert!(matches!(result, Err(RenderError::Spawn { .. })));
        assert_eq!(entries(dir.path()), vec!["mermaid-config.json".to_owned()]);
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    /// Write an executable shell script standing in for the diagram tool.
    #[cfg(unix)]
    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-mmdc");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn cli_with_tool(work_dir: &Path, tools: &Path, body: &str) -> MermaidCli {
        let tool = fake_tool(tools, body);
        MermaidCli::new(work_dir).command(tool.to_string_lossy())
    }

    #[cfg(unix)]
    #[test]
    fn test_render_reads_tool_output() {
        let dir = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let cli = cli_with_tool(
            dir.path(),
            tools.path(),
            r#"while [ "$1" != "-o" ]; do shift; done; echo '<svg/>' > "$2""#,
        );

        let svg = cli.render("graph TD; A-->B").unwrap();

        assert_eq!(svg.trim(), "<svg/>");
        assert_eq!(entries(dir.path()), vec!["mermaid-config.json".to_owned()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_is_exit_error_with_stderr() {
        let dir = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let cli = cli_with_tool(dir.path(), tools.path(), "echo 'Parse error on line 1' >&2; exit 3");

        let result = cli.render("graph TD; A-->");

        match result {
            Err(RenderError::Exit { status, stderr }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "Parse error on line 1");
            }
            other => panic!("expected exit error, got {other:?}"),
        }
        assert_eq!(entries(dir.path()), vec!["mermaid-config.json".to_owned()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_tool_is_missing_output() {
        let dir = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let cli = cli_with_tool(dir.path(), tools.path(), "exit 0");

        let result = cli.render("graph TD; A-->B");

        assert!(matches!(result, Err(RenderError::MissingOutput)));
        assert_eq!(entries(dir.path()), vec!["mermaid-config.json".to_owned()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_tool_times_out() {
        let dir = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let cli = cli_with_tool(dir.path(), tools.path(), "exec sleep 5")
            .timeout(Some(Duration::from_millis(300)));

        let started = Instant::now();
        let result = cli.render("graph TD; A-->B");

        assert!(matches!(result, Err(RenderError::Timeout(limit)) if limit == Duration::from_millis(300)));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(entries(dir.path()), vec!["mermaid-config.json".to_owned()]);
    }

    #[test]
    fn test_render_creates_work_dir() {
        let dir = TempDir::new().unwrap();
        let work_dir = dir.path().join("nested").join("cache");
        let cli = MermaidCli::new(&work_dir).command("folio-test-no-such-diagram-tool");

        let _ = cli.render("graph TD; A-->B");

        assert!(work_dir.join("mermaid-config.json").is_file());
    }
}
