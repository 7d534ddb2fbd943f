use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{error, info, warn};

use verity_common::{
    Config, FailureKind, ServiceFailure, ServiceName, ServicePayload, ServiceResult, ServiceTask,
    VerificationReport, VerificationRequest, VerityError, DEFAULT_EVIDENCE_TIMEOUT,
    DEFAULT_MODEL_TIMEOUT, DEFAULT_SOCIAL_LIMIT,
};

use crate::traits::{FactChecker, NewsVerifier, Predictor, SocialSearcher, WebScraper};

/// The injected collaborators, one per service. Cheap to clone.
#[derive(Clone)]
pub struct Collaborators {
    pub model: Arc<dyn Predictor>,
    pub factcheck: Arc<dyn FactChecker>,
    pub newsapi: Arc<dyn NewsVerifier>,
    pub twitter: Arc<dyn SocialSearcher>,
    pub reddit: Arc<dyn SocialSearcher>,
    pub webscrape: Arc<dyn WebScraper>,
}

/// Fans one request out to every service concurrently, bounds each with its
/// own timeout, and folds whatever comes back into a `VerificationReport`.
///
/// Holds no per-request state; concurrent calls are independent.
pub struct VerificationDispatcher {
    collaborators: Collaborators,
    tasks: Vec<ServiceTask>,
    social_limit: usize,
}

impl VerificationDispatcher {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            tasks: ServiceTask::default_set(DEFAULT_MODEL_TIMEOUT, DEFAULT_EVIDENCE_TIMEOUT),
            social_limit: DEFAULT_SOCIAL_LIMIT,
        }
    }

    pub fn from_config(collaborators: Collaborators, config: &Config) -> Self {
        Self::new(collaborators)
            .with_timeouts(config.model_timeout, config.service_timeout)
            .with_social_limit(config.social_result_limit)
    }

    pub fn with_timeouts(mut self, model: Duration, evidence: Duration) -> Self {
        self.tasks = ServiceTask::default_set(model, evidence);
        self
    }

    pub fn with_social_limit(mut self, limit: usize) -> Self {
        self.social_limit = limit;
        self
    }

    pub fn tasks(&self) -> &[ServiceTask] {
        &self.tasks
    }

    pub async fn run_parallel_verification(
        &self,
        original_text: &str,
        summary_text: &str,
    ) -> VerificationReport {
        self.run(&VerificationRequest::new(original_text, summary_text))
            .await
    }

    /// Run every task once against the request's summary text. Never fails:
    /// timeouts, errors and panics become error entries in the report.
    pub async fn run(&self, request: &VerificationRequest) -> VerificationReport {
        let started = Instant::now();
        info!(
            text_len = request.original_text.len(),
            summary_len = request.summary_text.len(),
            services = self.tasks.len(),
            "Starting parallel verification"
        );

        let guarded = self.tasks.iter().map(|task| {
            let call = self.invoke(task, &request.summary_text);
            settle(*task, call)
        });
        let results: BTreeMap<ServiceName, ServiceResult> =
            join_all(guarded).await.into_iter().collect();

        let report = VerificationReport::new(results, self.tasks.len(), started.elapsed());
        info!(
            execution_time = report.execution_time,
            services_checked = report.services_checked,
            services_successful = report.services_successful,
            "Parallel verification complete"
        );
        report
    }

    fn invoke<'a>(
        &'a self,
        task: &ServiceTask,
        text: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<ServicePayload>> {
        let c = &self.collaborators;
        let timeout = task.timeout;
        let limit = self.social_limit;
        match task.name {
            ServiceName::Model => async move {
                c.model.predict(text).await.map(ServicePayload::Model)
            }
            .boxed(),
            ServiceName::Factcheck => async move {
                c.factcheck
                    .search(text, timeout)
                    .await
                    .map(ServicePayload::FactCheck)
            }
            .boxed(),
            ServiceName::Newsapi => async move {
                c.newsapi
                    .verify(text, timeout)
                    .await
                    .map(ServicePayload::News)
            }
            .boxed(),
            ServiceName::Twitter => async move {
                c.twitter
                    .search(text, None, limit)
                    .await
                    .map(ServicePayload::Social)
            }
            .boxed(),
            ServiceName::Reddit => async move {
                c.reddit
                    .search(text, None, limit)
                    .await
                    .map(ServicePayload::Social)
            }
            .boxed(),
            ServiceName::Webscrape => async move {
                c.webscrape
                    .scrape(text)
                    .await
                    .map(ServicePayload::WebScrape)
            }
            .boxed(),
        }
    }
}

/// Drive one task to a terminal state: completed, failed, or timed out.
async fn settle(
    task: ServiceTask,
    call: BoxFuture<'_, anyhow::Result<ServicePayload>>,
) -> (ServiceName, ServiceResult) {
    let started = Instant::now();
    let outcome = tokio::time::timeout(task.timeout, AssertUnwindSafe(call).catch_unwind()).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let result = match outcome {
        Err(_) => {
            warn!(
                service = %task.name,
                kind = ?FailureKind::Timeout,
                timeout_secs = task.timeout.as_secs_f64(),
                "Service timed out"
            );
            ServiceResult::Failed(ServiceFailure::timeout())
        }
        Ok(Err(panic)) => {
            let message = panic_message(panic.as_ref());
            error!(service = %task.name, kind = ?FailureKind::Fault, panic = %message, "Service panicked");
            ServiceResult::Failed(ServiceFailure::fault(format!("panicked: {message}")))
        }
        Ok(Ok(Err(e))) => {
            let failure = match e.downcast_ref::<VerityError>() {
                Some(unavailable @ VerityError::Unavailable(_)) => {
                    ServiceFailure::unavailable(unavailable)
                }
                _ => ServiceFailure::fault(format!("{e:#}")),
            };
            warn!(
                service = %task.name,
                kind = ?failure.kind,
                error = %failure.reason,
                elapsed_ms,
                "Service failed"
            );
            ServiceResult::Failed(failure)
        }
        Ok(Ok(Ok(payload))) if !payload.is_available() => {
            let failure =
                ServiceFailure::unavailable(VerityError::Unavailable(task.name.to_string()));
            warn!(
                service = %task.name,
                kind = ?failure.kind,
                error = %failure.reason,
                "Service unavailable"
            );
            ServiceResult::Failed(failure)
        }
        Ok(Ok(Ok(payload))) => {
            info!(service = %task.name, count = payload.count(), elapsed_ms, "Service succeeded");
            ServiceResult::Completed(payload)
        }
    };

    (task.name, result)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
