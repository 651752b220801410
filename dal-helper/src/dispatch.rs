//! Building a DAL from resolved sources and handing it to a demo or an
//! interactive host.

use std::fmt::Display;
use std::io::Write;

use tracing::{debug, info};

use crate::config::{DEFAULT_BINDING, DEFAULT_SHELL_HEADER, MainConfig};
use crate::error::DalError;
use crate::inspector::Inspector;
use crate::resolve::Sources;

/// Builds a DAL instance from resolved sources.
///
/// Implemented for any `Fn(Sources) -> anyhow::Result<T>` where `T: Display`,
/// so a constructor function can be passed directly.
pub trait DalFactory {
    /// The DAL type; its `Display` rendering is printed before the demo runs.
    type Dal: Display;

    /// Construct the DAL.
    ///
    /// # Errors
    ///
    /// Any failure to read or interpret the sources.
    fn build(&self, sources: Sources) -> anyhow::Result<Self::Dal>;
}

impl<F, T> DalFactory for F
where
    F: Fn(Sources) -> anyhow::Result<T>,
    T: Display,
{
    type Dal = T;

    fn build(&self, sources: Sources) -> anyhow::Result<T> {
        self(sources)
    }
}

/// Example operations run against a freshly built DAL.
pub trait Demo<T> {
    /// Exercise the DAL.
    ///
    /// # Errors
    ///
    /// Whatever the demo chooses to report.
    fn run(&self, dal: &T) -> anyhow::Result<()>;
}

impl<F, T> Demo<T> for F
where
    F: Fn(&T) -> anyhow::Result<()>,
{
    fn run(&self, dal: &T) -> anyhow::Result<()> {
        self(dal)
    }
}

/// Something that can take over control with the DAL bound to a name, such as
/// a read-eval-print loop.
pub trait InteractiveHost<T> {
    /// Run the session; returns when the operator ends it.
    ///
    /// # Errors
    ///
    /// Session I/O failures.
    fn embed(&mut self, header: &str, binding: &str, dal: &T) -> anyhow::Result<()>;
}

/// A DAL factory plus the optional behaviours that can follow construction.
pub struct Runner<'a, F: DalFactory> {
    factory: F,
    demo: Option<Box<dyn Demo<F::Dal> + 'a>>,
    host: Option<Box<dyn InteractiveHost<F::Dal> + 'a>>,
    header: String,
    binding: String,
}

impl<'a, F: DalFactory> Runner<'a, F> {
    /// Runner with no demo and the default interactive host.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            demo: None,
            host: None,
            header: DEFAULT_SHELL_HEADER.to_owned(),
            binding: DEFAULT_BINDING.to_owned(),
        }
    }

    /// Demo to run when `--interactive` is not given.
    #[must_use]
    pub fn demo(mut self, demo: impl Demo<F::Dal> + 'a) -> Self {
        self.demo = Some(Box::new(demo));
        self
    }

    /// Interactive host to use instead of the terminal [`Inspector`].
    #[must_use]
    pub fn host(mut self, host: impl InteractiveHost<F::Dal> + 'a) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    /// Session header and binding name.
    ///
    /// Takes precedence over [`MainConfig::shell_header`] and [`MainConfig::binding`]
    /// when the runner is driven by [`crate::run`].
    #[must_use]
    pub fn session(mut self, header: impl Into<String>, binding: impl Into<String>) -> Self {
        self.header = header.into();
        self.binding = binding.into();
        self
    }

    /// Fill in session settings from `config`, keeping any set with [`Runner::session`].
    pub(crate) fn session_from_config(mut self, config: &MainConfig) -> Self {
        if self.header == DEFAULT_SHELL_HEADER {
            self.header.clone_from(&config.shell_header);
        }
        if self.binding == DEFAULT_BINDING {
            self.binding.clone_from(&config.binding);
        }
        self
    }

    /// Build the DAL, print it to `out`, then run the interactive host or the demo.
    ///
    /// In non-interactive mode the demo is checked before the factory is called,
    /// so a missing demo never touches the data.
    ///
    /// # Errors
    ///
    /// - [`DalError::MissingDemo`] when `interactive` is false and no demo was supplied
    /// - [`DalError::Construction`] when the factory fails
    /// - [`DalError::Io`] when printing the DAL fails
    /// - [`DalError::Session`] / [`DalError::Demo`] when the chosen behaviour fails
    pub fn dispatch(
        &mut self,
        sources: Sources,
        interactive: bool,
        out: &mut dyn Write,
    ) -> Result<(), DalError> {
        if !interactive && self.demo.is_none() {
            return Err(DalError::MissingDemo);
        }

        debug!(count = sources.len(), "building DAL");
        let dal = self
            .factory
            .build(sources)
            .map_err(DalError::Construction)?;

        writeln!(out, "{dal}")?;
        out.flush()?;

        if interactive {
            info!(binding = %self.binding, "entering interactive session");
            let session = match self.host.as_mut() {
                Some(host) => host.embed(&self.header, &self.binding, &dal),
                None => Inspector::stdio()
                    .and_then(|mut inspector| inspector.embed(&self.header, &self.binding, &dal)),
            };
            session.map_err(DalError::Session)
        } else if let Some(demo) = &self.demo {
            info!("running demo");
            demo.run(&dal).map_err(DalError::Demo)
        } else {
            Err(DalError::MissingDemo)
        }
    }
}
