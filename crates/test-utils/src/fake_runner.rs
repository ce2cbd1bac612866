use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use lessbatch::exec::{CommandRunner, LaunchError, ProcessResult};

type Response = Arc<dyn Fn() -> ProcessResult + Send + Sync>;

/// One recorded call to [`FakeRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub working_dir: Option<PathBuf>,
    pub command: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn is_version_probe(&self) -> bool {
        self.args == ["-v"]
    }

    /// File name of the first argument (the compiler's input file).
    pub fn input_file_name(&self) -> Option<String> {
        let first = self.args.first()?;
        Path::new(first)
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }
}

/// A fake command runner that:
/// - records every invocation
/// - answers `-v` with a configurable version response
/// - answers compile calls with a per-input-file scripted result, or a clean
///   exit 0 when nothing was scripted.
pub struct FakeRunner {
    version: Response,
    responses: HashMap<String, Response>,
    invocations: Mutex<Vec<Invocation>>,
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            version: Arc::new(|| ProcessResult::completed(0, "lessc 2.3.1\n", "")),
            responses: HashMap::new(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Script the result for the input file called `file_name`.
    pub fn respond(
        mut self,
        file_name: &str,
        response: impl Fn() -> ProcessResult + Send + Sync + 'static,
    ) -> Self {
        self.responses.insert(file_name.to_string(), Arc::new(response));
        self
    }

    pub fn exit_with(self, file_name: &str, exit_code: i32, stderr: &'static str) -> Self {
        self.respond(file_name, move || ProcessResult::completed(exit_code, "", stderr))
    }

    pub fn stdout_for(self, file_name: &str, stdout: &'static str) -> Self {
        self.respond(file_name, move || ProcessResult::completed(0, stdout, ""))
    }

    pub fn with_version(mut self, response: impl Fn() -> ProcessResult + Send + Sync + 'static) -> Self {
        self.version = Arc::new(response);
        self
    }

    /// Make the `-v` probe fail as if the executable did not exist.
    pub fn without_executable(self) -> Self {
        self.with_version(|| {
            ProcessResult::launch_failed(LaunchError::Spawn {
                command: "lessc".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        })
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Input file names of all compile calls, in call order.
    pub fn compiled_files(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter(|i| !i.is_version_probe())
            .filter_map(|i| i.input_file_name())
            .collect()
    }

    fn response_for(&self, invocation: &Invocation) -> ProcessResult {
        if invocation.is_version_probe() {
            return (self.version)();
        }
        invocation
            .input_file_name()
            .and_then(|name| self.responses.get(&name))
            .map(|response| response())
            .unwrap_or_else(|| ProcessResult::completed(0, "", ""))
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        working_dir: Option<&'a Path>,
        command: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ProcessResult> + Send + 'a>> {
        let invocation = Invocation {
            working_dir: working_dir.map(Path::to_path_buf),
            command: command.to_string(),
            args: args.to_vec(),
        };

        Box::pin(async move {
            let result = self.response_for(&invocation);
            self.invocations.lock().unwrap().push(invocation);
            result
        })
    }
}
