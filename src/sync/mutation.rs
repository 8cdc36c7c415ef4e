//! Writes, confirmations and busy state

use std::future::Future;

use tracing::{debug, info, warn};

use super::context::PageContext;
use crate::error::{ApiError, ApiResult};
use crate::host::{Host, Notice};

/// Prefix for failed-write notices
pub const FAILURE_PREFIX: &str = "操作失败: ";

/// Wait cursor and dimmed cards for as long as the guard lives
pub struct BusyGuard<H: Host> {
    host: H,
}

impl<H: Host> BusyGuard<H> {
    pub fn new(host: &H) -> Self {
        host.set_busy(true);
        Self { host: host.clone() }
    }
}

impl<H: Host> Drop for BusyGuard<H> {
    fn drop(&mut self) {
        self.host.set_busy(false);
    }
}

/// Tell the user their session is gone, then send them to login after the
/// configured delay.
pub fn escalate_auth<T, H: Host>(ctx: &PageContext<T, H>, message: &str) {
    warn!(message, "authentication required, scheduling login redirect");
    ctx.host.notify(Notice::danger(message));

    let host = ctx.host.clone();
    let login = ctx.config.navigation.login_path.clone();
    ctx.host.schedule(
        ctx.config.navigation.auth_redirect_delay_ms,
        Box::new(move || host.navigate(&login)),
    );
}

/// Surface a failed write. The form is left untouched.
pub fn report_failure<T, H: Host>(ctx: &PageContext<T, H>, err: &ApiError, prefix: &str) {
    if err.is_auth() {
        escalate_auth(ctx, &err.user_message());
        return;
    }
    warn!(error = %err, "write failed");
    ctx.host.notify(Notice::danger(format!("{}{}", prefix, err.user_message())));
}

/// Issue one write; notify `success` or the joined error text
pub async fn run_mutation<T, H, R, F>(ctx: &PageContext<T, H>, request: F, success: &str) -> ApiResult<R>
where
    H: Host,
    F: Future<Output = ApiResult<R>>,
{
    run_mutation_with(ctx, request, success, FAILURE_PREFIX).await
}

/// [`run_mutation`] with a page-specific failure prefix. An empty `success`
/// suppresses the confirmation toast.
pub async fn run_mutation_with<T, H, R, F>(
    ctx: &PageContext<T, H>,
    request: F,
    success: &str,
    failure_prefix: &str,
) -> ApiResult<R>
where
    H: Host,
    F: Future<Output = ApiResult<R>>,
{
    match request.await {
        Ok(value) => {
            info!(outcome = %success, "write succeeded");
            if !success.is_empty() {
                ctx.host.notify(Notice::success(success));
            }
            Ok(value)
        }
        Err(err) => {
            report_failure(ctx, &err, failure_prefix);
            Err(err)
        }
    }
}

/// Mandatory confirmation before any destructive request
pub fn confirmed<H: Host>(host: &H, message: &str) -> bool {
    let accepted = host.confirm(message);
    if !accepted {
        debug!(message, "destructive action cancelled");
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoticeLevel;
    use crate::testing::{Harness, RecordingHost};

    #[test]
    fn test_busy_guard_clears_on_drop() {
        let host = RecordingHost::new();
        {
            let _guard = BusyGuard::new(&host);
            assert_eq!(host.busy_history(), vec![true]);
        }
        assert_eq!(host.busy_history(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_busy_guard_clears_on_early_return() {
        let harness = Harness::new();

        async fn guarded(host: &RecordingHost) -> ApiResult<()> {
            let _guard = BusyGuard::new(host);
            let response: ApiResult<()> = Err(ApiError::Network("down".into()));
            response?;
            Ok(())
        }

        assert!(guarded(&harness.host).await.is_err());
        assert_eq!(harness.host.busy_history(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_success_notifies() {
        let harness = Harness::new();
        let value = run_mutation(&harness.ctx, async { Ok(7) }, "记录添加成功！").await.unwrap();
        assert_eq!(value, 7);
        let notices = harness.host.notices();
        assert_eq!(notices[0].message, "记录添加成功！");
        assert_eq!(notices[0].level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_failure_reports_joined_message() {
        let harness = Harness::new();
        let result: ApiResult<()> = run_mutation(
            &harness.ctx,
            async { Err(ApiError::Validation { status: 400, message: "a\nb".into() }) },
            "记录添加成功！",
        )
        .await;
        assert!(result.is_err());
        assert_eq!(harness.host.notices()[0].message, "操作失败: a\nb");
        assert_eq!(harness.host.notices()[0].level, NoticeLevel::Danger);
    }

    #[test]
    fn test_declined_confirmation() {
        let host = RecordingHost::declining();
        assert!(!confirmed(&host, "您确定要删除这条记录吗？"));
        assert_eq!(host.confirmations(), vec!["您确定要删除这条记录吗？".to_string()]);
    }
}
