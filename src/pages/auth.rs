//! Login, Registration and Logout
//!
//! Login and registration report into an inline response banner instead of
//! toasts; a 401 here means bad credentials, not an expired session, so it is
//! never escalated to a login redirect.

use tracing::{info, warn};

use super::{ActionError, ActionResult};
use crate::common::CurrentUser;
use crate::error::ApiError;
use crate::forms::{FormValues, ValidationError};
use crate::host::{Host, Notice};
use crate::http::{Method, Transport};
use crate::models::{ensure_success, LoginRequest, LoginResponse, RegisterRequest, StatusMessage};
use crate::render::escape_html;
use crate::sync::{confirmed, PageContext};

pub const LOGIN_PATH: &str = "/api/login/";
pub const REGISTER_PATH: &str = "/api/register/";
pub const LOGOUT_PATH: &str = "/api/logout/";

pub mod ids {
    pub const RESPONSE: &str = "response-message";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const PASSWORD_CONFIRM: &str = "password_confirm";
}

const PASSWORD_MISMATCH: &str = "两次输入的密码不一致！";
const CREDENTIALS_MISSING: &str = "请输入用户名和密码！";
const REGISTER_FIELDS_MISSING: &str = "请填写所有字段！";
const LOGIN_REDIRECT_SUFFIX: &str = " 即将跳转到登录页面...";

/// Inline banner under the login/register form
pub fn render_response(success: bool, message: &str) -> String {
    format!(
        r#"<div class="response-message {}">{}</div>"#,
        if success { "success" } else { "error" },
        escape_html(message)
    )
}

impl LoginRequest {
    pub fn from_form(form: &FormValues) -> Result<Self, ValidationError> {
        Ok(Self {
            username: form.required(ids::USERNAME, CREDENTIALS_MISSING)?.to_string(),
            password: form.required(ids::PASSWORD, CREDENTIALS_MISSING)?.to_string(),
        })
    }
}

impl RegisterRequest {
    pub fn from_form(form: &FormValues) -> Result<Self, ValidationError> {
        let username = form.required(ids::USERNAME, REGISTER_FIELDS_MISSING)?;
        let email = form.required(ids::EMAIL, REGISTER_FIELDS_MISSING)?;
        let password = form.required(ids::PASSWORD, REGISTER_FIELDS_MISSING)?;
        if password != form.get(ids::PASSWORD_CONFIRM) {
            return Err(ValidationError::new(PASSWORD_MISMATCH));
        }
        Ok(Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

pub struct AuthPage<T, H> {
    ctx: PageContext<T, H>,
}

impl<T: Transport, H: Host> AuthPage<T, H> {
    pub fn new(ctx: PageContext<T, H>) -> Self {
        Self { ctx }
    }

    fn show(&self, success: bool, message: &str) {
        self.ctx.host.set_hidden(ids::RESPONSE, false);
        self.ctx.host.render(ids::RESPONSE, render_response(success, message));
    }

    fn show_invalid(&self, err: ValidationError) -> ActionError {
        self.show(false, &err.0);
        ActionError::Invalid(err)
    }

    fn show_failure(&self, err: ApiError) -> ActionError {
        warn!(error = %err, "authentication request failed");
        self.show(false, &err.user_message());
        ActionError::Api(err)
    }

    fn redirect_after(&self, delay_ms: u32, url: &str) {
        let host = self.ctx.host.clone();
        let url = url.to_string();
        self.ctx.host.schedule(delay_ms, Box::new(move || host.navigate(&url)));
    }

    /// Sign in, remember the user and head to the dashboard after a short pause
    pub async fn login(&self, form: &FormValues) -> ActionResult<Option<CurrentUser>> {
        let request = LoginRequest::from_form(form).map_err(|e| self.show_invalid(e))?;

        let response: LoginResponse = self
            .ctx
            .client
            .send(Method::Post, LOGIN_PATH, &request)
            .await
            .map_err(|e| self.show_failure(e))?;

        let user = match (response.user_id, response.username.clone()) {
            (Some(user_id), Some(username)) => Some(CurrentUser { user_id, username }),
            _ => None,
        };
        match &user {
            Some(user) => {
                user.save(self.ctx.durable.as_ref());
                info!(user_id = user.user_id, "signed in");
            }
            None => warn!("login response carried no user identity"),
        }

        self.show(true, &response.message);
        let nav = &self.ctx.config.navigation;
        self.redirect_after(nav.login_redirect_delay_ms, &nav.dashboard_path);
        Ok(user)
    }

    /// Create an account, then send the user to the login page
    pub async fn register(&self, form: &FormValues) -> ActionResult {
        let request = RegisterRequest::from_form(form).map_err(|e| self.show_invalid(e))?;

        let response: StatusMessage = self
            .ctx
            .client
            .send(Method::Post, REGISTER_PATH, &request)
            .await
            .map_err(|e| self.show_failure(e))?;

        info!(username = %request.username, "account registered");
        self.show(true, &format!("{}{}", response.message, LOGIN_REDIRECT_SUFFIX));
        let nav = &self.ctx.config.navigation;
        self.redirect_after(nav.register_redirect_delay_ms, &nav.login_path);
        Ok(())
    }
}

/// Navbar logout, available on every signed-in page
pub async fn logout<T: Transport, H: Host>(ctx: &PageContext<T, H>) -> ActionResult {
    if !confirmed(&ctx.host, "您确定要注销吗？") {
        return Err(ActionError::Cancelled);
    }

    let result = async {
        let response: StatusMessage = ctx.client.send_empty(Method::Post, LOGOUT_PATH).await?;
        ensure_success(&response.status, &response.message)
    }
    .await;

    match result {
        Ok(()) => {
            CurrentUser::clear(ctx.durable.as_ref());
            info!("signed out");
            ctx.host.notify(Notice::success("您已成功注销！"));
            ctx.host.navigate(&ctx.config.navigation.login_path);
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "logout failed");
            let message = match &err {
                ApiError::Network(_) => "注销时发生网络错误。".to_string(),
                other => format!("注销失败: {}", other.user_message()),
            };
            ctx.host.notify(Notice::danger(message));
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    fn login_form() -> FormValues {
        FormValues::new().with(ids::USERNAME, "xiaoming").with(ids::PASSWORD, "secret")
    }

    #[tokio::test]
    async fn test_login_saves_user_and_schedules_dashboard() {
        let harness = Harness::new();
        harness.backend.respond(
            Method::Post,
            LOGIN_PATH,
            200,
            r#"{"status": "success", "message": "登录成功！", "user_id": 7, "username": "xiaoming"}"#,
        );
        let page = AuthPage::new(harness.ctx.clone());

        let user = page.login(&login_form()).await.unwrap().unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(CurrentUser::load(harness.durable.as_ref()), Some(user));
        assert!(harness.host.rendered(ids::RESPONSE).unwrap().contains("response-message success"));

        assert!(harness.host.navigations().is_empty());
        assert_eq!(harness.host.scheduled_delays(), vec![1500]);
        harness.host.run_scheduled();
        assert_eq!(harness.host.navigations(), vec!["/dashboard/".to_string()]);
    }

    #[tokio::test]
    async fn test_bad_credentials_stay_on_page() {
        let harness = Harness::new();
        harness.backend.respond(
            Method::Post,
            LOGIN_PATH,
            401,
            r#"{"status": "error", "message": "用户名或密码错误"}"#,
        );
        let page = AuthPage::new(harness.ctx.clone());

        let err = page.login(&login_form()).await.unwrap_err();
        assert!(matches!(err, ActionError::Api(ApiError::AuthRequired { .. })));
        let html = harness.host.rendered(ids::RESPONSE).unwrap();
        assert!(html.contains("response-message error"));
        assert!(html.contains("用户名或密码错误"));
        assert!(harness.host.scheduled_delays().is_empty());
        assert!(harness.host.notices().is_empty());
    }

    #[tokio::test]
    async fn test_register_password_mismatch_sends_nothing() {
        let harness = Harness::new();
        let page = AuthPage::new(harness.ctx.clone());
        let form = FormValues::new()
            .with(ids::USERNAME, "xiaoming")
            .with(ids::EMAIL, "x@campus.edu")
            .with(ids::PASSWORD, "abc123")
            .with(ids::PASSWORD_CONFIRM, "abc124");

        let err = page.register(&form).await.unwrap_err();
        assert!(matches!(err, ActionError::Invalid(_)));
        assert!(harness.host.rendered(ids::RESPONSE).unwrap().contains(PASSWORD_MISMATCH));
        assert!(harness.backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_register_blank_fields_sends_nothing() {
        let harness = Harness::new();
        let page = AuthPage::new(harness.ctx.clone());
        let form = FormValues::new()
            .with(ids::USERNAME, "")
            .with(ids::EMAIL, "")
            .with(ids::PASSWORD, "")
            .with(ids::PASSWORD_CONFIRM, "");

        let err = page.register(&form).await.unwrap_err();
        assert!(matches!(err, ActionError::Invalid(_)));
        assert!(harness.host.rendered(ids::RESPONSE).unwrap().contains(REGISTER_FIELDS_MISSING));
        assert!(harness.backend.requests().is_empty());

        let no_email = FormValues::new()
            .with(ids::USERNAME, "xiaoming")
            .with(ids::PASSWORD, "abc123")
            .with(ids::PASSWORD_CONFIRM, "abc123");
        assert!(matches!(page.register(&no_email).await, Err(ActionError::Invalid(_))));
        assert!(harness.backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_register_redirects_to_login() {
        let harness = Harness::new();
        harness.backend.respond(
            Method::Post,
            REGISTER_PATH,
            201,
            r#"{"status": "success", "message": "注册成功！"}"#,
        );
        let page = AuthPage::new(harness.ctx.clone());
        let form = FormValues::new()
            .with(ids::USERNAME, "xiaoming")
            .with(ids::EMAIL, "x@campus.edu")
            .with(ids::PASSWORD, "abc123")
            .with(ids::PASSWORD_CONFIRM, "abc123");

        page.register(&form).await.unwrap();
        assert!(harness
            .host
            .rendered(ids::RESPONSE)
            .unwrap()
            .contains("注册成功！ 即将跳转到登录页面..."));
        assert_eq!(harness.host.scheduled_delays(), vec![2000]);
        harness.host.run_scheduled();
        assert_eq!(harness.host.navigations(), vec!["/login/".to_string()]);
    }

    #[tokio::test]
    async fn test_logout_clears_user() {
        let harness = Harness::new();
        CurrentUser { user_id: 7, username: "xiaoming".into() }.save(harness.durable.as_ref());
        harness.backend.respond(Method::Post, LOGOUT_PATH, 200, r#"{"status": "success", "message": ""}"#);

        logout(&harness.ctx).await.unwrap();
        assert_eq!(harness.host.confirmations(), vec!["您确定要注销吗？".to_string()]);
        assert_eq!(CurrentUser::load(harness.durable.as_ref()), None);
        assert_eq!(harness.host.last_notice().unwrap().message, "您已成功注销！");
        assert_eq!(harness.host.navigations(), vec!["/login/".to_string()]);
    }

    #[tokio::test]
    async fn test_logout_declined_or_rejected() {
        let harness = Harness::declining();
        assert_eq!(logout(&harness.ctx).await, Err(ActionError::Cancelled));
        assert!(harness.backend.requests().is_empty());

        let harness = Harness::new();
        CurrentUser { user_id: 7, username: "xiaoming".into() }.save(harness.durable.as_ref());
        harness.backend.respond(
            Method::Post,
            LOGOUT_PATH,
            200,
            r#"{"status": "error", "message": "会话不存在"}"#,
        );
        logout(&harness.ctx).await.unwrap_err();
        assert_eq!(harness.host.last_notice().unwrap().message, "注销失败: 会话不存在");
        assert!(CurrentUser::load(harness.durable.as_ref()).is_some());
        assert!(harness.host.navigations().is_empty());
    }
}
