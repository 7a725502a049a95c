//! Argument assembly.
//!
//! Merges user arguments, synthesized arguments, inputs and libraries into
//! final invocations, in this order:
//!
//! ```text
//! start args | implied args | inputs | libraries | mid args | output switch | end args
//! ```
//!
//! When the command line exceeds the family's length ceiling, the whole
//! argument list goes into a response file if the family supports one.
//! Otherwise the inputs are split across several invocations, each
//! repeating every fixed argument.

use std::io::Write;
use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use tempfile::TempPath;
use thiserror::Error;

use crate::core::argument::{ArgLocation, CommandArgument};
use crate::util::diagnostic::Diagnostic;

use super::toolchain::{serialized_len, CommandSpec, FamilyId, Limit, ToolchainAdapter};

/// Assembly failed. No partial invocation list is ever produced.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum AssembleError {
    #[error("command line for {} is {length} characters, over the {limit} character limit of `{family}`", describe(.file))]
    #[diagnostic(
        code(nativelink::assemble::command_too_long),
        help("shorten paths or use a toolchain family that supports response files")
    )]
    CommandTooLong {
        family: FamilyId,
        file: Option<PathBuf>,
        length: usize,
        limit: usize,
    },

    #[error("failed to write response file")]
    #[diagnostic(code(nativelink::assemble::response_file))]
    ResponseFile(#[source] std::io::Error),
}

fn describe(file: &Option<PathBuf>) -> String {
    match file {
        Some(path) => format!("`{}`", path.display()),
        None => "the fixed arguments".to_string(),
    }
}

impl AssembleError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            AssembleError::CommandTooLong { file, .. } => {
                let mut diag = Diagnostic::error(self.to_string());
                if let Some(path) = file {
                    diag = diag.with_location(path);
                }
                diag.with_suggestion("Shorten the input paths or move them closer to the working directory")
            }
            AssembleError::ResponseFile(err) => {
                Diagnostic::error(self.to_string()).with_context(err.to_string())
            }
        }
    }
}

/// Everything that goes on the command line.
#[derive(Debug, Clone, Default)]
pub struct AssemblyRequest {
    /// Active user arguments, in declaration order
    pub arguments: Vec<CommandArgument>,
    /// Synthesized arguments
    pub implied: Vec<String>,
    pub inputs: Vec<PathBuf>,
    /// Library arguments from the toolchain
    pub libraries: Vec<String>,
    pub output: Option<PathBuf>,
}

/// The assembled invocations.
///
/// Response files live as long as this value.
#[derive(Debug)]
pub struct Assembly {
    pub invocations: Vec<CommandSpec>,
    response_files: Vec<TempPath>,
}

impl Assembly {
    pub fn response_files(&self) -> impl Iterator<Item = &Path> {
        self.response_files.iter().map(|p| -> &Path { p })
    }

    /// Keep the response files on disk after this value is dropped.
    pub fn persist_response_files(&mut self) -> std::io::Result<Vec<PathBuf>> {
        self.response_files
            .drain(..)
            .map(|p| p.keep().map_err(|e| e.error))
            .collect()
    }
}

/// Builds invocations for one toolchain family.
pub struct ArgumentAssembler<'a> {
    adapter: &'a dyn ToolchainAdapter,
    response_dir: Option<PathBuf>,
}

impl<'a> ArgumentAssembler<'a> {
    pub fn new(adapter: &'a dyn ToolchainAdapter) -> Self {
        ArgumentAssembler {
            adapter,
            response_dir: None,
        }
    }

    /// Write response files into `dir` instead of the system temp dir.
    pub fn with_response_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.response_dir = Some(dir.into());
        self
    }

    pub fn assemble(&self, request: &AssemblyRequest) -> Result<Assembly, AssembleError> {
        let descriptor = self.adapter.descriptor();
        let program = descriptor.command;
        let limit = descriptor.max_command_length;
        let response_files_supported = self.adapter.supports_response_files();

        let (head, tail) = self.fixed_args(request);
        let inputs: Vec<String> = request
            .inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        let mut assembly = Assembly {
            invocations: Vec::new(),
            response_files: Vec::new(),
        };

        if descriptor.max_inputs_per_invocation.allows(inputs.len()) {
            let args = compose(&head, &inputs, &tail);
            let length = serialized_len(program, &args);
            if limit.allows(length) {
                assembly.invocations.push(CommandSpec::new(program).args(args));
                return Ok(assembly);
            }
            if response_files_supported {
                tracing::debug!(
                    "command line is {} characters (limit {}), using a response file",
                    length,
                    limit
                );
                let invocation = self.via_response_file(&args, &mut assembly)?;
                assembly.invocations.push(invocation);
                return Ok(assembly);
            }
        }

        let chunks = self.split(program, &head, &inputs, &tail, response_files_supported)?;
        tracing::debug!(
            "splitting {} input(s) across {} invocation(s)",
            inputs.len(),
            chunks.len()
        );
        for chunk in chunks {
            let args = compose(&head, chunk, &tail);
            let invocation = if limit.allows(serialized_len(program, &args)) {
                CommandSpec::new(program).args(args)
            } else {
                // only reachable when response files are supported
                self.via_response_file(&args, &mut assembly)?
            };
            assembly.invocations.push(invocation);
        }
        Ok(assembly)
    }

    /// Arguments before the inputs, and after them.
    fn fixed_args(&self, request: &AssemblyRequest) -> (Vec<String>, Vec<String>) {
        let located = |location: ArgLocation| {
            request
                .arguments
                .iter()
                .filter(move |a| a.location == location)
                .map(|a| a.value.clone())
        };

        let mut head: Vec<String> = located(ArgLocation::Start).collect();
        head.extend(request.implied.iter().cloned());

        let mut tail = request.libraries.clone();
        tail.extend(located(ArgLocation::Mid));
        if let Some(output) = &request.output {
            tail.extend(self.adapter.output_switch(output));
        }
        tail.extend(located(ArgLocation::End));

        (head, tail)
    }

    /// Greedily group inputs into chunks bounded by the input count and,
    /// without response-file support, by the length ceiling.
    fn split<'i>(
        &self,
        program: &str,
        head: &[String],
        inputs: &'i [String],
        tail: &[String],
        response_files_supported: bool,
    ) -> Result<Vec<&'i [String]>, AssembleError> {
        let descriptor = self.adapter.descriptor();
        let max_inputs = descriptor.max_inputs_per_invocation;
        let limit = if response_files_supported {
            Limit::Unbounded
        } else {
            descriptor.max_command_length
        };

        let fixed_len = serialized_len(program, head) + serialized_len("", tail);
        if inputs.is_empty() {
            return Err(AssembleError::CommandTooLong {
                family: descriptor.family,
                file: None,
                length: fixed_len,
                limit: limit.get().unwrap_or(usize::MAX),
            });
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut length = fixed_len;
        for (i, input) in inputs.iter().enumerate() {
            let token_len = input.len() + 1;
            if !limit.allows(fixed_len + token_len) {
                return Err(AssembleError::CommandTooLong {
                    family: descriptor.family,
                    file: Some(PathBuf::from(input)),
                    length: fixed_len + token_len,
                    limit: limit.get().unwrap_or(usize::MAX),
                });
            }

            let count = i - start;
            if count > 0 && (!max_inputs.allows(count + 1) || !limit.allows(length + token_len)) {
                chunks.push(&inputs[start..i]);
                start = i;
                length = fixed_len;
            }
            length += token_len;
        }
        chunks.push(&inputs[start..]);
        Ok(chunks)
    }

    fn via_response_file(
        &self,
        args: &[String],
        assembly: &mut Assembly,
    ) -> Result<CommandSpec, AssembleError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("nativelink-").suffix(".rsp");
        let mut file = match &self.response_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(AssembleError::ResponseFile)?;

        file.write_all(response_file_contents(args).as_bytes())
            .map_err(AssembleError::ResponseFile)?;
        file.flush().map_err(AssembleError::ResponseFile)?;

        let path = file.into_temp_path();
        let switch = self
            .adapter
            .command_file_switch(&path)
            .map_err(|e| AssembleError::ResponseFile(std::io::Error::other(e)))?;
        assembly.response_files.push(path);

        Ok(CommandSpec::new(self.adapter.descriptor().command).arg(switch))
    }
}

fn compose(head: &[String], inputs: &[String], tail: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(head.len() + inputs.len() + tail.len());
    args.extend_from_slice(head);
    args.extend_from_slice(inputs);
    args.extend_from_slice(tail);
    args
}

/// One argument per line; arguments containing whitespace or quotes are
/// double-quoted.
pub fn response_file_contents(args: &[String]) -> String {
    let mut contents = String::new();
    for arg in args {
        if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"') {
            push_quoted(&mut contents, arg);
        } else {
            contents.push_str(arg);
        }
        contents.push('\n');
    }
    contents
}

/// Backslashes are literal unless they precede a quote, so a run of them
/// before an embedded quote or the closing quote is doubled.
fn push_quoted(out: &mut String, arg: &str) {
    out.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                out.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.extend(std::iter::repeat('\\').take(backslashes));
                out.push(c);
                backslashes = 0;
            }
        }
    }
    out.extend(std::iter::repeat('\\').take(backslashes * 2));
    out.push('"');
}
