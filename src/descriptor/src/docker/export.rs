//! Dockerfile exporter.
//!
//! Renders a descriptor into Dockerfile text, one line per instruction in
//! sequence order. RUN/CMD/ENTRYPOINT use the shell form for a single
//! parameter and the exec (JSON array) form otherwise.
//!
//! Field values never span lines: a value that would break the line is
//! either moved into a JSON array (commands, ADD/COPY/VOLUME paths) or
//! refused with an export error.
//!
//! The whole text is rendered before anything is written, so an instruction
//! that cannot be rendered leaves the sink untouched.

use std::io::Write;

use docker_descriptor_core::config::ExportConfig;
use docker_descriptor_core::error::{DescriptorError, Result};

use super::descriptor::DockerDescriptor;
use super::instruction::{
    AddInstruction, ArgInstruction, CommentInstruction, CopyInstruction, EnvInstruction,
    ExposeInstruction, FromInstruction, Instruction, LabelInstruction, OnBuildInstruction,
};
use super::kind::InstructionKind;

/// Serializes a descriptor into a sink.
pub trait Exporter {
    /// Write the descriptor's instructions to `sink`, in order.
    fn render(&self, descriptor: &DockerDescriptor, sink: &mut dyn Write) -> Result<()>;
}

/// Exporter producing standard Dockerfile syntax.
#[derive(Debug, Clone, Default)]
pub struct DockerfileExporter {
    config: ExportConfig,
}

impl DockerfileExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render the whole descriptor as Dockerfile text.
    pub fn render_to_string(&self, descriptor: &DockerDescriptor) -> Result<String> {
        let eol = self.config.line_ending.as_str();
        let mut lines = Vec::with_capacity(descriptor.len());
        for (position, instruction) in descriptor.iter().enumerate() {
            let line = self.render_instruction(instruction).map_err(|e| match e {
                DescriptorError::ExportError(message) => DescriptorError::ExportError(format!(
                    "Instruction {}: {}",
                    position + 1,
                    message
                )),
                other => other,
            })?;
            lines.push(line);
        }

        let mut text = lines.join(eol);
        if self.config.trailing_newline && !lines.is_empty() {
            text.push_str(eol);
        }
        Ok(text)
    }

    /// Render a single instruction. Comments spanning several lines come
    /// back joined by the configured line ending.
    pub fn render_instruction(&self, instruction: &Instruction) -> Result<String> {
        match instruction {
            Instruction::From(from) => render_from(from),
            Instruction::Maintainer(m) => {
                Ok(format!("MAINTAINER {}", required(m.name(), "MAINTAINER", "a name")?))
            }
            Instruction::Run(run) => self.render_command(InstructionKind::Run, run.parameters()),
            Instruction::Cmd(cmd) => self.render_command(InstructionKind::Cmd, cmd.parameters()),
            Instruction::Entrypoint(entrypoint) => {
                self.render_command(InstructionKind::Entrypoint, entrypoint.parameters())
            }
            Instruction::Expose(expose) => render_expose(expose),
            Instruction::Env(env) => render_env(env),
            Instruction::Add(add) => render_add(add),
            Instruction::Copy(copy) => render_copy(copy),
            Instruction::Volume(volume) => {
                let path = required(volume.name(), "VOLUME", "a path")?;
                if needs_json_paths(&[path]) {
                    Ok(format!("VOLUME {}", json_array(&[path])?))
                } else {
                    Ok(format!("VOLUME {}", path))
                }
            }
            Instruction::User(user) => {
                Ok(format!("USER {}", required(user.name(), "USER", "a username")?))
            }
            Instruction::Workdir(workdir) => {
                Ok(format!("WORKDIR {}", required(workdir.path(), "WORKDIR", "a path")?))
            }
            Instruction::OnBuild(onbuild) => self.render_onbuild(onbuild),
            Instruction::Comment(comment) => Ok(self.render_comment(comment)),
            Instruction::Label(label) => render_label(label),
            Instruction::Arg(arg) => render_arg(arg),
        }
    }

    fn render_command(&self, kind: InstructionKind, parameters: &[String]) -> Result<String> {
        match parameters {
            [] => Err(DescriptorError::ExportError(format!(
                "{} requires at least one parameter",
                kind.keyword()
            ))),
            [single] if !self.config.exec_form && !has_line_break(single) => {
                Ok(format!("{} {}", kind.keyword(), single))
            }
            _ => Ok(format!("{} {}", kind.keyword(), json_array(parameters)?)),
        }
    }

    fn render_onbuild(&self, onbuild: &OnBuildInstruction) -> Result<String> {
        let nested = onbuild.instruction().ok_or_else(|| {
            DescriptorError::ExportError("ONBUILD requires a nested instruction".to_string())
        })?;

        // A comment is not an instruction and may span several lines
        if nested.kind() == InstructionKind::Comment {
            return Err(DescriptorError::ExportError(
                "ONBUILD can not wrap a comment".to_string(),
            ));
        }

        Ok(format!("ONBUILD {}", self.render_instruction(nested)?))
    }

    fn render_comment(&self, comment: &CommentInstruction) -> String {
        let text = comment.text().unwrap_or("");
        if text.is_empty() {
            return "#".to_string();
        }
        text.lines()
            .map(|line| {
                if line.is_empty() {
                    "#".to_string()
                } else {
                    format!("# {}", line)
                }
            })
            .collect::<Vec<_>>()
            .join(self.config.line_ending.as_str())
    }
}

impl Exporter for DockerfileExporter {
    fn render(&self, descriptor: &DockerDescriptor, sink: &mut dyn Write) -> Result<()> {
        let text = self.render_to_string(descriptor)?;
        sink.write_all(text.as_bytes())?;
        sink.flush()?;

        tracing::debug!(
            instructions = descriptor.len(),
            bytes = text.len(),
            "Exported Dockerfile"
        );
        Ok(())
    }
}

// --- Individual instruction renderers ---

fn render_from(from: &FromInstruction) -> Result<String> {
    let name = token(required(from.name(), "FROM", "an image name")?, "FROM")?;
    match from.alias() {
        Some(alias) => Ok(format!("FROM {} AS {}", name, token(alias, "FROM")?)),
        None => Ok(format!("FROM {}", name)),
    }
}

fn render_expose(expose: &ExposeInstruction) -> Result<String> {
    if expose.ports().is_empty() {
        return Err(DescriptorError::ExportError(
            "EXPOSE requires at least one port".to_string(),
        ));
    }
    let ports: Vec<String> = expose.ports().iter().map(u16::to_string).collect();
    Ok(format!("EXPOSE {}", ports.join(" ")))
}

fn render_env(env: &EnvInstruction) -> Result<String> {
    let key = bare_key(required(env.key(), "ENV", "a key")?, "ENV")?;
    let value = quote(env.value().unwrap_or(""))?;
    Ok(format!("ENV {}={}", key, value))
}

fn render_label(label: &LabelInstruction) -> Result<String> {
    let key = bare_key(required(label.key(), "LABEL", "a key")?, "LABEL")?;
    let value = quote(label.value().unwrap_or(""))?;
    Ok(format!("LABEL {}={}", key, value))
}

fn render_arg(arg: &ArgInstruction) -> Result<String> {
    let name = bare_key(required(arg.name(), "ARG", "a name")?, "ARG")?;
    match arg.default_value() {
        Some(default) => Ok(format!("ARG {}={}", name, quote(default)?)),
        None => Ok(format!("ARG {}", name)),
    }
}

fn render_add(add: &AddInstruction) -> Result<String> {
    let source = required(add.source(), "ADD", "a source")?;
    let destination = required(add.destination(), "ADD", "a destination")?;
    Ok(format!("ADD {}", transfer_paths(source, destination)?))
}

fn render_copy(copy: &CopyInstruction) -> Result<String> {
    let source = required(copy.source(), "COPY", "a source")?;
    let destination = required(copy.destination(), "COPY", "a destination")?;
    let paths = transfer_paths(source, destination)?;
    match copy.from_stage() {
        Some(stage) => Ok(format!("COPY --from={} {}", token(stage, "COPY")?, paths)),
        None => Ok(format!("COPY {}", paths)),
    }
}

/// `<src> <dst>`, or `["<src>", "<dst>"]` when a path would split.
fn transfer_paths(source: &str, destination: &str) -> Result<String> {
    if needs_json_paths(&[source, destination]) {
        json_array(&[source, destination])
    } else {
        Ok(format!("{} {}", source, destination))
    }
}

// --- Helpers ---

fn has_line_break(value: &str) -> bool {
    value.contains(|c: char| c == '\n' || c == '\r')
}

/// Unwrap a required field or report which one is missing.
///
/// Values containing a line break are refused; they would start a new
/// instruction.
fn required<'a>(value: Option<&'a str>, keyword: &str, what: &str) -> Result<&'a str> {
    match value {
        Some(v) if has_line_break(v) => Err(DescriptorError::ExportError(format!(
            "{} value {:?} contains a line break",
            keyword, v
        ))),
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DescriptorError::ExportError(format!(
            "{} requires {}",
            keyword, what
        ))),
    }
}

/// A value that must stay a single bare word.
fn token<'a>(value: &'a str, keyword: &str) -> Result<&'a str> {
    if value.chars().any(char::is_whitespace) {
        return Err(DescriptorError::ExportError(format!(
            "{} value {:?} contains whitespace",
            keyword, value
        )));
    }
    Ok(value)
}

/// An ENV/LABEL key or ARG name: a bare word without `=`.
fn bare_key<'a>(value: &'a str, keyword: &str) -> Result<&'a str> {
    if value.contains('=') {
        return Err(DescriptorError::ExportError(format!(
            "{} key {:?} contains '='",
            keyword, value
        )));
    }
    token(value, keyword)
}

fn needs_json_paths(paths: &[&str]) -> bool {
    paths
        .iter()
        .any(|p| p.contains(|c: char| c.is_whitespace() || c == '"'))
}

/// Format parameters as a JSON array like `["a", "b"]`.
fn json_array<S: AsRef<str>>(parameters: &[S]) -> Result<String> {
    let items = parameters
        .iter()
        .map(|p| serde_json::to_string(p.as_ref()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| DescriptorError::ExportError(format!("Invalid parameter: {}", e)))?;
    Ok(format!("[{}]", items.join(", ")))
}

/// Double-quote a value when it would not survive as a bare word.
///
/// Only `"` and `\` are escaped; the Dockerfile parser keeps every other
/// character inside quotes literally.
fn quote(value: &str) -> Result<String> {
    if has_line_break(value) {
        return Err(DescriptorError::ExportError(format!(
            "Value {:?} contains a line break",
            value
        )));
    }
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '\\');
    if !needs_quotes {
        return Ok(value.to_string());
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Ok(quoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::instruction::{
        CmdInstruction, EntrypointInstruction, MaintainerInstruction, RunInstruction,
        UserInstruction, VolumeInstruction, WorkdirInstruction,
    };
    use docker_descriptor_core::config::LineEnding;

    fn line(instruction: impl Into<Instruction>) -> String {
        DockerfileExporter::default()
            .render_instruction(&instruction.into())
            .unwrap()
    }

    fn line_err(instruction: impl Into<Instruction>) -> String {
        DockerfileExporter::default()
            .render_instruction(&instruction.into())
            .unwrap_err()
            .to_string()
    }

    // --- FROM ---

    #[test]
    fn test_render_from() {
        assert_eq!(line(FromInstruction::new("alpine:3.19")), "FROM alpine:3.19");
    }

    #[test]
    fn test_render_from_with_alias() {
        let mut from = FromInstruction::new("golang:1.21");
        from.set_alias("builder");
        assert_eq!(line(from), "FROM golang:1.21 AS builder");
    }

    #[test]
    fn test_render_from_without_name() {
        assert!(line_err(FromInstruction::default()).contains("FROM requires an image name"));
    }

    // --- RUN / CMD / ENTRYPOINT ---

    #[test]
    fn test_render_run_shell() {
        assert_eq!(
            line(RunInstruction::new(["apt-get update && apt-get install -y curl"])),
            "RUN apt-get update && apt-get install -y curl"
        );
    }

    #[test]
    fn test_render_run_exec() {
        assert_eq!(
            line(RunInstruction::new(["echo", "hello"])),
            r#"RUN ["echo", "hello"]"#
        );
    }

    #[test]
    fn test_render_cmd_exec_escapes() {
        assert_eq!(
            line(CmdInstruction::new(["sh", "-c", "echo \"hi\""])),
            r#"CMD ["sh", "-c", "echo \"hi\""]"#
        );
    }

    #[test]
    fn test_render_entrypoint_shell() {
        assert_eq!(
            line(EntrypointInstruction::new(["/bin/agent --listen"])),
            "ENTRYPOINT /bin/agent --listen"
        );
    }

    #[test]
    fn test_render_exec_form_forced() {
        let exporter = DockerfileExporter::new(ExportConfig {
            exec_form: true,
            ..ExportConfig::default()
        });
        let rendered = exporter
            .render_instruction(&EntrypointInstruction::new(["python"]).into())
            .unwrap();
        assert_eq!(rendered, r#"ENTRYPOINT ["python"]"#);
    }

    #[test]
    fn test_render_run_line_break_uses_exec_form() {
        assert_eq!(
            line(RunInstruction::new(["echo a\nUSER root"])),
            r#"RUN ["echo a\nUSER root"]"#
        );
        assert_eq!(
            line(CmdInstruction::new(["printf 'x\r\n'"])),
            r#"CMD ["printf 'x\r\n'"]"#
        );
    }

    #[test]
    fn test_render_run_empty() {
        assert!(line_err(RunInstruction::default()).contains("RUN requires at least one parameter"));
        assert!(line_err(CmdInstruction::default()).contains("CMD"));
    }

    // --- EXPOSE ---

    #[test]
    fn test_render_expose() {
        assert_eq!(line(ExposeInstruction::new([80, 443])), "EXPOSE 80 443");
    }

    #[test]
    fn test_render_expose_empty() {
        assert!(line_err(ExposeInstruction::default()).contains("EXPOSE requires at least one port"));
    }

    // --- ENV / LABEL / ARG ---

    #[test]
    fn test_render_env() {
        assert_eq!(
            line(EnvInstruction::new("PATH", "/usr/local/bin:/usr/bin")),
            "ENV PATH=/usr/local/bin:/usr/bin"
        );
    }

    #[test]
    fn test_render_env_quoted() {
        assert_eq!(
            line(EnvInstruction::new("MSG", "hello world")),
            r#"ENV MSG="hello world""#
        );
        assert_eq!(line(EnvInstruction::new("EMPTY", "")), r#"ENV EMPTY="""#);
    }

    #[test]
    fn test_render_value_keeps_control_characters() {
        assert_eq!(
            line(EnvInstruction::new("K", "a\tb\u{7}")),
            "ENV K=\"a\tb\u{7}\""
        );
        assert_eq!(
            line(LabelInstruction::new("path", r#"C:\dir "x""#)),
            r#"LABEL path="C:\\dir \"x\"""#
        );
    }

    #[test]
    fn test_render_value_line_break() {
        assert!(line_err(EnvInstruction::new("K", "a\nRUN rm -rf /")).contains("line break"));

        let mut arg = ArgInstruction::new("VERSION");
        arg.set_default_value("1\r\n");
        assert!(line_err(arg).contains("line break"));
    }

    #[test]
    fn test_render_key_must_be_bare_word() {
        assert!(line_err(EnvInstruction::new("MY KEY", "v")).contains("whitespace"));
        assert!(line_err(LabelInstruction::new("a=b", "v")).contains("'='"));
        assert!(line_err(ArgInstruction::new("A\nRUN x")).contains("line break"));
    }

    #[test]
    fn test_render_env_without_key() {
        let mut env = EnvInstruction::default();
        env.set_value("x");
        assert!(line_err(env).contains("ENV requires a key"));
    }

    #[test]
    fn test_render_label() {
        assert_eq!(
            line(LabelInstruction::new("description", "My App")),
            r#"LABEL description="My App""#
        );
    }

    #[test]
    fn test_render_arg() {
        assert_eq!(line(ArgInstruction::new("VERSION")), "ARG VERSION");

        let mut arg = ArgInstruction::new("VERSION");
        arg.set_default_value("1.0.0");
        assert_eq!(line(arg), "ARG VERSION=1.0.0");
    }

    // --- ADD / COPY ---

    #[test]
    fn test_render_add() {
        assert_eq!(
            line(AddInstruction::new("app.tar.gz", "/opt/")),
            "ADD app.tar.gz /opt/"
        );
    }

    #[test]
    fn test_render_copy_from_stage() {
        let mut copy = CopyInstruction::new("/app/bin", "/usr/local/bin/");
        copy.set_from_stage("builder");
        assert_eq!(line(copy), "COPY --from=builder /app/bin /usr/local/bin/");
    }

    #[test]
    fn test_render_paths_with_whitespace_use_json_form() {
        assert_eq!(
            line(CopyInstruction::new("my file.txt", "/app/")),
            r#"COPY ["my file.txt", "/app/"]"#
        );
        assert_eq!(
            line(AddInstruction::new("a.tar", "/opt/my dir/")),
            r#"ADD ["a.tar", "/opt/my dir/"]"#
        );

        let mut copy = CopyInstruction::new("/out/my app", "/bin/");
        copy.set_from_stage("builder");
        assert_eq!(line(copy), r#"COPY --from=builder ["/out/my app", "/bin/"]"#);

        assert_eq!(line(VolumeInstruction::new("/my data")), r#"VOLUME ["/my data"]"#);
    }

    #[test]
    fn test_render_copy_stage_must_be_bare_word() {
        let mut copy = CopyInstruction::new("a", "b");
        copy.set_from_stage("build er");
        assert!(line_err(copy).contains("whitespace"));
    }

    #[test]
    fn test_render_copy_missing_destination() {
        let mut copy = CopyInstruction::default();
        copy.set_source("app.py");
        assert!(line_err(copy).contains("COPY requires a destination"));
    }

    // --- Single-argument instructions ---

    #[test]
    fn test_render_single_argument_instructions() {
        assert_eq!(line(MaintainerInstruction::new("alice")), "MAINTAINER alice");
        assert_eq!(line(VolumeInstruction::new("/data")), "VOLUME /data");
        assert_eq!(line(UserInstruction::new("1000:1000")), "USER 1000:1000");
        assert_eq!(line(WorkdirInstruction::new("/app")), "WORKDIR /app");
    }

    #[test]
    fn test_render_single_line_fields_refuse_line_breaks() {
        assert!(line_err(FromInstruction::new("alpine\nRUN rm -rf /")).contains("line break"));
        assert!(line_err(MaintainerInstruction::new("a\nb")).contains("line break"));
        assert!(line_err(UserInstruction::new("root\r")).contains("line break"));
        assert!(line_err(WorkdirInstruction::new("/app\nRUN x")).contains("line break"));
        assert!(line_err(CopyInstruction::new("a\nb", "/")).contains("line break"));

        let mut from = FromInstruction::new("alpine");
        from.set_alias("a b");
        assert!(line_err(from).contains("whitespace"));
    }

    #[test]
    fn test_render_empty_name_is_missing() {
        assert!(line_err(UserInstruction::new("")).contains("USER requires a username"));
        assert!(line_err(WorkdirInstruction::default()).contains("WORKDIR requires a path"));
    }

    // --- ONBUILD ---

    #[test]
    fn test_render_onbuild() {
        assert_eq!(
            line(OnBuildInstruction::new(RunInstruction::new(["make"]))),
            "ONBUILD RUN make"
        );
        assert_eq!(
            line(OnBuildInstruction::new(CopyInstruction::new(".", "/src"))),
            "ONBUILD COPY . /src"
        );
    }

    #[test]
    fn test_render_onbuild_empty() {
        assert!(line_err(OnBuildInstruction::default()).contains("ONBUILD requires a nested instruction"));
    }

    #[test]
    fn test_render_onbuild_wraps_any_instruction() {
        assert_eq!(
            line(OnBuildInstruction::new(FromInstruction::new("x"))),
            "ONBUILD FROM x"
        );
        assert_eq!(
            line(OnBuildInstruction::new(OnBuildInstruction::new(
                RunInstruction::new(["make"]),
            ))),
            "ONBUILD ONBUILD RUN make"
        );
    }

    #[test]
    fn test_render_onbuild_comment() {
        assert!(line_err(OnBuildInstruction::new(CommentInstruction::new("note")))
            .contains("ONBUILD can not wrap a comment"));
    }

    // --- Comments ---

    #[test]
    fn test_render_comment() {
        assert_eq!(line(CommentInstruction::new("Build stage")), "# Build stage");
        assert_eq!(line(CommentInstruction::default()), "#");
    }

    #[test]
    fn test_render_comment_multiline() {
        assert_eq!(
            line(CommentInstruction::new("first\n\nthird")),
            "# first\n#\n# third"
        );
    }

    // --- Whole descriptor ---

    #[test]
    fn test_render_to_string_empty_descriptor() {
        let text = DockerfileExporter::default()
            .render_to_string(&DockerDescriptor::new())
            .unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_render_to_string_crlf_without_trailing_newline() {
        let mut descriptor = DockerDescriptor::new();
        descriptor.set_from("alpine").push_run(["echo hi"]);

        let exporter = DockerfileExporter::new(ExportConfig {
            line_ending: LineEnding::Crlf,
            trailing_newline: false,
            ..ExportConfig::default()
        });
        assert_eq!(
            exporter.render_to_string(&descriptor).unwrap(),
            "FROM alpine\r\nRUN echo hi"
        );
    }

    #[test]
    fn test_render_error_reports_position() {
        let mut descriptor = DockerDescriptor::new();
        descriptor.set_from("alpine").push_run(["ok"]).expose();

        let err = DockerfileExporter::default()
            .render_to_string(&descriptor)
            .unwrap_err();
        assert!(matches!(err, DescriptorError::ExportError(_)));
        assert!(err.to_string().contains("Instruction 3"));
    }

    #[test]
    fn test_render_failure_writes_nothing() {
        let mut descriptor = DockerDescriptor::new();
        descriptor.set_from("alpine").on_build();

        let mut buf: Vec<u8> = Vec::new();
        let err = DockerfileExporter::default()
            .render(&descriptor, &mut buf)
            .unwrap_err();
        assert!(err.is_export_error());
        assert!(buf.is_empty());
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_export_error() {
        let mut descriptor = DockerDescriptor::new();
        descriptor.set_from("alpine");

        let err = DockerfileExporter::default()
            .render(&descriptor, &mut FailingSink)
            .unwrap_err();
        assert!(matches!(err, DescriptorError::SinkError(_)));
        assert!(err.is_export_error());
    }
}
