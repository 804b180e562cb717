//! Shared setup for command tests: a mock panel, a config directory, and captured streams.

use anyhow::Result;
use clap::Parser;
use httpmock::MockServer;
use soar_config::{ConfigLocator, GLOBAL_CONFIG_FILE, LogOptions};
use soar_telemetry::{Capture, Diagnostics};
use soar_test_support::fixtures::{config_yaml, write_config};
use tempfile::TempDir;

use crate::cli::{Cli, invoke};

pub(crate) const REQUEST_ID: &str = "00000000-0000-4000-8000-000000000001";

pub(crate) struct Harness {
    pub(crate) server: MockServer,
    dir: TempDir,
    out: Capture,
    err: Capture,
}

impl Harness {
    /// Mock panel plus a global config pointing both surfaces at it.
    pub(crate) fn new(parse_body: bool, parse_indent: bool) -> Result<Self> {
        let server = MockServer::start();
        let dir = tempfile::tempdir()?;
        write_config(
            dir.path(),
            GLOBAL_CONFIG_FILE,
            &config_yaml(&server.base_url(), parse_body, parse_indent),
        )?;
        Ok(Self {
            server,
            dir,
            out: Capture::new(),
            err: Capture::new(),
        })
    }

    /// Mock panel with a caller-supplied global config document.
    pub(crate) fn with_config(contents: &str) -> Result<Self> {
        let server = MockServer::start();
        let dir = tempfile::tempdir()?;
        write_config(dir.path(), GLOBAL_CONFIG_FILE, contents)?;
        Ok(Self {
            server,
            dir,
            out: Capture::new(),
            err: Capture::new(),
        })
    }

    /// Parse `args` (without the binary name) and run them; returns the exit code.
    pub(crate) fn run(&self, args: &[&str]) -> Result<i32> {
        let cli = Cli::try_parse_from(std::iter::once("soar").chain(args.iter().copied()))?;
        let locator = ConfigLocator::new(self.dir.path(), Some(self.dir.path().to_path_buf()));
        let mut diagnostics = Diagnostics::with_writers(
            LogOptions::default(),
            Box::new(self.out.clone()),
            Box::new(self.err.clone()),
        );
        Ok(invoke(cli, &locator, REQUEST_ID, &mut diagnostics))
    }

    pub(crate) fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub(crate) fn stdout(&self) -> String {
        self.out.contents()
    }

    pub(crate) fn stderr(&self) -> String {
        self.err.contents()
    }
}
