//! Java adapter: `javac -d <build> Translated.java Main.java`, then `java -cp <build> Main args...`.

use std::path::Path;

use crossverify_core::LanguageId;
use crossverify_core::conventions::JAVA_DRIVER_CLASS;

use super::{Invocation, RunnerAdapter};
use crate::harness::java;

pub struct JavaAdapter {
    javac: String,
    java: String,
}

impl JavaAdapter {
    pub fn new(javac: impl Into<String>, java: impl Into<String>) -> Self {
        Self {
            javac: javac.into(),
            java: java.into(),
        }
    }
}

impl RunnerAdapter for JavaAdapter {
    fn language(&self) -> LanguageId {
        LanguageId::Java
    }

    fn build_command(&self, build_dir: &Path) -> Option<Invocation> {
        Some(
            Invocation::new(&self.javac)
                .arg("-d")
                .arg(build_dir.to_string_lossy())
                .arg(java::container_file_name())
                .arg(java::driver_file_name()),
        )
    }

    fn run_command(&self, build_dir: &Path) -> Invocation {
        Invocation::new(&self.java)
            .arg("-cp")
            .arg(build_dir.to_string_lossy())
            .arg(JAVA_DRIVER_CLASS)
    }
}
