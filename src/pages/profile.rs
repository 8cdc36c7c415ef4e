//! Profile Page

use tracing::debug;

use super::{reject_invalid, ActionResult};
use crate::forms::FormValues;
use crate::host::Host;
use crate::http::{Method, Transport};
use crate::models::{Profile, ProfileUpdate};
use crate::sync::{run_mutation_with, Container, LoadKind, LoadOutcome, PageContext};

pub const PROFILE_PATH: &str = "/api/profile/";

pub const SUBMIT_LABEL: &str = "保存更改";

pub mod ids {
    pub const STATUS: &str = "profile-status";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const GENDER: &str = "gender";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    pub const SUBMIT: &str = "profile-submit";
}

impl ProfileUpdate {
    /// An empty birth date is sent as `null`
    pub fn from_form(form: &FormValues) -> Result<Self, crate::forms::ValidationError> {
        Ok(Self {
            email: form.get(ids::EMAIL).to_string(),
            gender: form.get(ids::GENDER).to_string(),
            date_of_birth: form.optional_date(ids::DATE_OF_BIRTH, "请输入有效的出生日期！")?,
        })
    }
}

/// Spinner shown in the submit button while the update runs
pub fn busy_label() -> String {
    r#"<span class="spinner-border spinner-border-sm" role="status" aria-hidden="true"></span> 正在更新..."#
        .to_string()
}

/// Disables the submit button and swaps in the spinner until dropped
struct SubmitGuard<H: Host> {
    host: H,
}

impl<H: Host> SubmitGuard<H> {
    fn new(host: &H) -> Self {
        host.set_disabled(ids::SUBMIT, true);
        host.render(ids::SUBMIT, busy_label());
        Self { host: host.clone() }
    }
}

impl<H: Host> Drop for SubmitGuard<H> {
    fn drop(&mut self) {
        self.host.set_disabled(ids::SUBMIT, false);
        self.host.render(ids::SUBMIT, SUBMIT_LABEL.to_string());
    }
}

pub struct ProfilePage<T, H> {
    ctx: PageContext<T, H>,
    profile: Container<Profile>,
}

impl<T: Transport, H: Host> ProfilePage<T, H> {
    pub fn new(ctx: PageContext<T, H>) -> Self {
        Self {
            ctx,
            profile: Container::new(ids::STATUS),
        }
    }

    /// Prefill the form from the server copy
    pub async fn reconcile(&self) -> LoadOutcome<Profile> {
        let fetch = self.ctx.client.get(PROFILE_PATH, &[]);
        let outcome = self.profile.load(&self.ctx, LoadKind::Primary, fetch).await;
        if let LoadOutcome::Applied(profile) = &outcome {
            let host = &self.ctx.host;
            host.set_text(ids::USERNAME, &profile.username);
            host.set_value(ids::EMAIL, &profile.email);
            host.set_value(ids::GENDER, profile.gender.as_deref().unwrap_or(""));
            host.set_value(
                ids::DATE_OF_BIRTH,
                profile.date_of_birth.as_deref().and_then(|d| d.get(..10)).unwrap_or(""),
            );
        }
        outcome
    }

    pub async fn submit(&self, form: &FormValues) -> ActionResult {
        let update = ProfileUpdate::from_form(form).map_err(|e| reject_invalid(&self.ctx.host, e))?;
        debug!(has_birth_date = update.date_of_birth.is_some(), "updating profile");

        let _guard = SubmitGuard::new(&self.ctx.host);
        let request = self.ctx.client.send::<_, serde_json::Value>(Method::Put, PROFILE_PATH, &update);
        run_mutation_with(&self.ctx, request, "档案更新成功！", "").await?;
        Ok(())
    }
}
