//! Scheduler for periodic maintenance jobs.
//!
//! Jobs run on a cron schedule inside the server process. Each job receives its own clone of
//! the database connection and configuration, failures are logged and retried on the next tick.

use std::{future::Future, sync::Arc};

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{config::Config, error::Error};

pub mod cron;

/// Job scheduler for Roost's maintenance tasks
pub struct Scheduler {
    db: DatabaseConnection,
    config: Arc<Config>,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(db: DatabaseConnection, config: Arc<Config>) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { db, config, sched })
    }

    /// Registers a recurring job with the specified cron expression.
    ///
    /// On each run the job logs how many rows it changed, or the error it failed with.
    ///
    /// # Arguments
    /// - `cron` - Cron expression with seconds, e.g. `"0 0 * * * *"` for hourly
    /// - `name` - Name of the job used in log messages
    /// - `function` - Async job returning the number of rows it changed
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection, Arc<Config>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<u64, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let config = Arc::clone(&self.config);
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let config = Arc::clone(&config);
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db, config).await {
                        Ok(count) => tracing::debug!("Job {} changed {} row(s)", name, count),
                        Err(e) => tracing::error!("Error running job {}: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }

    /// Starts executing registered jobs
    pub async fn start(self) -> Result<(), Error> {
        self.sched.start().await?;

        Ok(())
    }
}
