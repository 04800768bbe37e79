//! C and C++ adapters: compile to a native executable, then run it directly.

use std::path::Path;

use crossverify_core::LanguageId;
use crossverify_core::conventions::EXECUTABLE_NAME;

use super::{Invocation, RunnerAdapter, path_arg};
use crate::harness::{c, cpp};

pub struct NativeAdapter {
    language: LanguageId,
    compiler: String,
}

impl NativeAdapter {
    /// `gcc prog.c -O2 -std=c11 -o prog -lm`
    pub fn c(compiler: impl Into<String>) -> Self {
        Self {
            language: LanguageId::C,
            compiler: compiler.into(),
        }
    }

    /// `g++ prog.cpp -O2 -std=c++17 -o prog`
    pub fn cpp(compiler: impl Into<String>) -> Self {
        Self {
            language: LanguageId::Cpp,
            compiler: compiler.into(),
        }
    }
}

impl RunnerAdapter for NativeAdapter {
    fn language(&self) -> LanguageId {
        self.language
    }

    fn build_command(&self, _build_dir: &Path) -> Option<Invocation> {
        let build = match self.language {
            LanguageId::Cpp => Invocation::new(&self.compiler)
                .arg(cpp::file_name())
                .arg("-O2")
                .arg("-std=c++17")
                .arg("-o")
                .arg(EXECUTABLE_NAME),
            _ => Invocation::new(&self.compiler)
                .arg(c::file_name())
                .arg("-O2")
                .arg("-std=c11")
                .arg("-o")
                .arg(EXECUTABLE_NAME)
                .arg("-lm"),
        };
        Some(build)
    }

    fn run_command(&self, build_dir: &Path) -> Invocation {
        Invocation::new(path_arg(build_dir, EXECUTABLE_NAME))
    }
}
