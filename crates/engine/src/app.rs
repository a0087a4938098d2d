//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::infrastructure::context::RequestContext;
use crate::infrastructure::ports::{ClockPort, PackageRepo, Repository, VersionRepo};
use crate::use_cases::{PackageCrud, RegistryUseCases, VersionCrud};

/// Main application state.
///
/// Holds the repository ports and use cases built over one backend.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    operation_timeout: Duration,
    shutdown: CancellationToken,
}

/// Container for repository ports.
pub struct Repositories {
    pub packages: Arc<dyn PackageRepo>,
    pub versions: Arc<dyn VersionRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub registry: RegistryUseCases,
}

impl App {
    /// Compose the app over a backend that stores both packages and versions.
    pub fn new<R>(repo: Arc<R>, clock: Arc<dyn ClockPort>, operation_timeout: Duration) -> Self
    where
        R: Repository + 'static,
    {
        let packages: Arc<dyn PackageRepo> = repo.clone();
        let versions: Arc<dyn VersionRepo> = repo;

        let registry = RegistryUseCases::new(
            PackageCrud::new(packages.clone(), clock.clone()),
            VersionCrud::new(versions.clone(), clock),
        );

        Self {
            repositories: Repositories { packages, versions },
            use_cases: UseCases { registry },
            operation_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    /// Fresh request context bounded by the configured operation timeout.
    ///
    /// Contexts are cancelled when the app shuts down.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new()
            .with_cancellation(self.shutdown.child_token())
            .with_timeout(self.operation_timeout)
    }

    /// Token whose cancellation stops the app and every in-flight request.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }
}
