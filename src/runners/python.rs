//! Python adapter: no build step, `python3 <build>/prog.py args...`.

use std::path::Path;

use crossverify_core::LanguageId;

use super::{Invocation, RunnerAdapter, path_arg};
use crate::harness::python;

pub struct PythonAdapter {
    interpreter: String,
}

impl PythonAdapter {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl RunnerAdapter for PythonAdapter {
    fn language(&self) -> LanguageId {
        LanguageId::Python
    }

    fn build_command(&self, _build_dir: &Path) -> Option<Invocation> {
        None
    }

    fn run_command(&self, build_dir: &Path) -> Invocation {
        // -B: never write __pycache__ into the (shared, read-only by contract) build directory.
        Invocation::new(&self.interpreter)
            .arg("-B")
            .arg(path_arg(build_dir, &python::file_name()))
    }
}
