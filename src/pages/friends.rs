//! Friends Page
//!
//! Friendships, pending requests and the friends' health feed. Every list is
//! rendered from the signed-in user's point of view, so nothing loads until
//! the stored user is known.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::{reject_invalid, ActionError, ActionResult, RowAction};
use crate::common::dates::parse_timestamp;
use crate::common::CurrentUser;
use crate::forms::{FormValues, ValidationError};
use crate::host::{Host, Notice};
use crate::http::{Method, Transport};
use crate::models::{Comment, FeedItem, Friendship};
use crate::render::{self, escape_html};
use crate::sync::{
    confirmed, escalate_auth, run_mutation, run_mutation_with, Container, LoadKind, LoadOutcome,
    PageContext,
};

pub const FRIENDSHIPS_PATH: &str = "/api/friendships/";
pub const FEED_PATH: &str = "/api/feed/";
pub const COMMENTS_PATH: &str = "/api/comments/";

pub mod ids {
    pub const FRIENDS: &str = "friends-list";
    pub const REQUESTS: &str = "friend-requests-list";
    pub const FEED: &str = "health-feed-container";
    pub const SEARCH: &str = "search-user-input";
    pub const COMMENT_TYPE: &str = "content_type";
    pub const COMMENT_OBJECT: &str = "object_id";
    pub const COMMENT_TEXT: &str = "text";
}

const MISSING_USER: &str = "无法加载用户信息，请重新登录。";

// ============ Feed Kinds ============

/// What a feed entry is about, keyed by the server's `content_type_model`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedKind {
    SleepRecord,
    SportRecord,
    Meal,
    BodyMetric,
    Article,
    Other(String),
}

struct KindInfo {
    tag: &'static str,
    label: &'static str,
    icon: &'static str,
}

static KIND_TABLE: [(FeedKind, KindInfo); 5] = [
    (FeedKind::SleepRecord, KindInfo { tag: "sleeprecord", label: "睡眠", icon: "bi-moon-stars" }),
    (FeedKind::SportRecord, KindInfo { tag: "sportrecord", label: "运动", icon: "bi-bicycle" }),
    (FeedKind::Meal, KindInfo { tag: "meal", label: "饮食", icon: "bi-egg-fried" }),
    (FeedKind::BodyMetric, KindInfo { tag: "bodymetric", label: "身体指标", icon: "bi-heart-pulse" }),
    (FeedKind::Article, KindInfo { tag: "article", label: "文章", icon: "bi-journal-text" }),
];

impl FeedKind {
    pub fn from_tag(tag: &str) -> Self {
        KIND_TABLE
            .iter()
            .find(|(_, info)| info.tag == tag)
            .map(|(kind, _)| kind.clone())
            .unwrap_or_else(|| FeedKind::Other(tag.to_string()))
    }

    fn info(&self) -> Option<&'static KindInfo> {
        KIND_TABLE.iter().find(|(kind, _)| kind == self).map(|(_, info)| info)
    }

    /// Wire value, used again when querying and posting comments
    pub fn tag(&self) -> &str {
        match self {
            FeedKind::Other(tag) => tag,
            known => known.info().map(|i| i.tag).unwrap_or_default(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.info().map(|i| i.label).unwrap_or("动态")
    }

    pub fn icon(&self) -> &'static str {
        self.info().map(|i| i.icon).unwrap_or("bi-activity")
    }

    /// Query pairs selecting the comments on one object of this kind
    pub fn comment_query(&self, object_id: u64) -> [(&str, String); 2] {
        [
            ("content_type_model", self.tag().to_string()),
            ("object_id", object_id.to_string()),
        ]
    }
}

impl FeedItem {
    pub fn kind(&self) -> FeedKind {
        FeedKind::from_tag(&self.content_type_model)
    }

    /// DOM id of this entry's comment list
    pub fn comments_slot(&self) -> String {
        format!("comments-for-{}-{}", self.content_type_model, self.object_id)
    }
}

// ============ Rendering ============

fn feed_time(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn render_friends(friendships: &[Friendship], me: u64) -> String {
    if friendships.is_empty() {
        return render::empty_list_item("你还没有好友，快去添加吧！");
    }
    friendships
        .iter()
        .map(|f| {
            let authorized = f.my_permission(me);
            format!(
                r#"<li class="list-group-item d-flex justify-content-between align-items-center"><span>{name}</span><div class="d-flex align-items-center"><div class="form-check form-switch me-3" title="是否授权对方查看我的动态"><input class="form-check-input permission-switch" type="checkbox" role="switch" id="permission-switch-{id}" data-id="{id}"{checked}><label class="form-check-label small" for="permission-switch-{id}">{label}</label></div><button type="button" class="btn btn-sm btn-outline-danger" data-action="delete" data-id="{id}" title="删除好友"><i class="bi bi-trash"></i></button></div></li>"#,
                name = escape_html(&f.other_party(me).username),
                id = f.id,
                checked = if authorized { " checked" } else { "" },
                label = if authorized { "已授权" } else { "未授权" },
            )
        })
        .collect()
}

/// Only requests addressed to `me` are actionable
pub fn render_requests(pending: &[Friendship], me: u64) -> String {
    let incoming: Vec<&Friendship> = pending.iter().filter(|f| f.to_user_info.id == me).collect();
    if incoming.is_empty() {
        return render::empty_list_item("暂无新的好友请求");
    }
    incoming
        .iter()
        .map(|f| {
            format!(
                r#"<li class="list-group-item d-flex justify-content-between align-items-center"><span>{name}</span><div><button type="button" class="btn btn-sm btn-success me-2" data-action="accept" data-id="{id}">接受</button><button type="button" class="btn btn-sm btn-secondary" data-action="reject" data-id="{id}">拒绝</button></div></li>"#,
                name = escape_html(&f.from_user_info.username),
                id = f.id,
            )
        })
        .collect()
}

pub fn render_feed(items: &[FeedItem]) -> String {
    if items.is_empty() {
        return r#"<div class="text-center p-5 bg-light rounded">好友们很安静，还没有任何动态。</div>"#.to_string();
    }
    items
        .iter()
        .map(|item| {
            let kind = item.kind();
            format!(
                r#"<div class="card mb-3"><div class="card-body"><div class="d-flex align-items-center mb-2"><div class="fw-bold me-2">{user}</div><span class="badge bg-light text-dark me-2"><i class="bi {icon} me-1"></i>{label}</span><div class="text-muted small">{time}</div></div><p class="card-text">{content}</p><hr><div class="comments-section"><div class="comments-list" id="{slot}"></div><form class="comment-form mt-2" data-content-type="{tag}" data-object-id="{object}"><div class="input-group"><input type="text" name="text" class="form-control form-control-sm" placeholder="添加评论..." required><button type="submit" class="btn btn-sm btn-outline-primary">发送</button></div></form></div></div></div>"#,
                user = escape_html(&item.user.username),
                icon = kind.icon(),
                label = kind.label(),
                time = escape_html(&feed_time(&item.timestamp)),
                content = escape_html(&item.content),
                slot = escape_html(&item.comments_slot()),
                tag = escape_html(kind.tag()),
                object = item.object_id,
            )
        })
        .collect()
}

pub fn render_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| {
            format!(
                r#"<p class="small mb-1 bg-light p-2 rounded"><strong class="me-2">{}</strong>: {}</p>"#,
                escape_html(&c.author_username),
                escape_html(&c.text)
            )
        })
        .collect()
}

// ============ Requests ============

#[derive(Debug, Serialize)]
struct FriendRequest<'a> {
    to_user_username: &'a str,
}

#[derive(Debug, Serialize)]
struct PermissionUpdate {
    can_view: bool,
}

/// Body of POST `/api/comments/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentInput {
    pub content_type: String,
    pub object_id: u64,
    pub text: String,
}

impl CommentInput {
    pub fn from_form(form: &FormValues) -> Result<Self, ValidationError> {
        let object_id = form
            .get(ids::COMMENT_OBJECT)
            .parse()
            .map_err(|_| ValidationError::new("评论目标无效"))?;
        Ok(Self {
            content_type: form.required(ids::COMMENT_TYPE, "评论目标无效")?.to_string(),
            object_id,
            text: form.required(ids::COMMENT_TEXT, "请输入评论内容！")?.to_string(),
        })
    }
}

// ============ Controller ============

pub struct FriendsPage<T, H> {
    ctx: PageContext<T, H>,
    user: Option<CurrentUser>,
    friends: Container<Vec<Friendship>>,
    requests: Container<Vec<Friendship>>,
    feed: Container<Vec<FeedItem>>,
    comments: RefCell<HashMap<String, Rc<Container<Vec<Comment>>>>>,
}

impl<T: Transport, H: Host> FriendsPage<T, H> {
    pub fn new(ctx: PageContext<T, H>) -> Self {
        let user = CurrentUser::load(ctx.durable.as_ref());
        Self {
            ctx,
            user,
            friends: Container::new(ids::FRIENDS).with_error_markup(render::error_list_item),
            requests: Container::new(ids::REQUESTS),
            feed: Container::new(ids::FEED).with_degraded_markup(
                r#"<div class="alert alert-warning">无法加载好友动态，请稍后重试。</div>"#,
            ),
            comments: RefCell::new(HashMap::new()),
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Load everything. Without a stored user only the re-login notice is shown.
    pub async fn reconcile(&self) {
        if self.user.is_none() {
            warn!("no signed-in user in storage");
            self.ctx.host.render(
                ids::FEED,
                format!(r#"<div class="alert alert-danger">{}</div>"#, MISSING_USER),
            );
            return;
        }
        self.load_relationships().await;
        self.load_feed().await;
    }

    pub async fn load_relationships(&self) {
        let Some(me) = self.user.as_ref().map(|u| u.user_id) else {
            return;
        };

        let fetch = self.ctx.client.get(FRIENDSHIPS_PATH, &[("status", "accepted")]);
        if let LoadOutcome::Applied(friends) = self.friends.load(&self.ctx, LoadKind::Primary, fetch).await {
            self.ctx.host.render(ids::FRIENDS, render_friends(&friends, me));
        }

        let fetch = self.ctx.client.get(FRIENDSHIPS_PATH, &[("status", "pending")]);
        if let LoadOutcome::Applied(pending) = self.requests.load(&self.ctx, LoadKind::Secondary, fetch).await {
            self.ctx.host.render(ids::REQUESTS, render_requests(&pending, me));
        }
    }

    /// Render the feed, then each entry's comments in order
    pub async fn load_feed(&self) -> LoadOutcome<Vec<FeedItem>> {
        let fetch = self.ctx.client.get(FEED_PATH, &[]);
        let outcome = self.feed.load(&self.ctx, LoadKind::Secondary, fetch).await;
        if let LoadOutcome::Applied(items) = &outcome {
            self.ctx.host.render(ids::FEED, render_feed(items));
            for item in items {
                self.load_comments(&item.kind(), item.object_id).await;
            }
        }
        outcome
    }

    fn comment_container(&self, slot: &str) -> Rc<Container<Vec<Comment>>> {
        let mut containers = self.comments.borrow_mut();
        Rc::clone(
            containers
                .entry(slot.to_string())
                .or_insert_with(|| Rc::new(Container::new(slot))),
        )
    }

    pub async fn load_comments(&self, kind: &FeedKind, object_id: u64) -> LoadOutcome<Vec<Comment>> {
        let slot = format!("comments-for-{}-{}", kind.tag(), object_id);
        let container = self.comment_container(&slot);

        let query = kind.comment_query(object_id);
        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let fetch = self.ctx.client.get(COMMENTS_PATH, &pairs);
        let outcome = container.load(&self.ctx, LoadKind::Secondary, fetch).await;
        if let LoadOutcome::Applied(comments) = &outcome {
            self.ctx.host.render(&slot, render_comments(comments));
        }
        outcome
    }

    pub async fn send_request(&self, form: &FormValues) -> ActionResult {
        let username = form
            .required(ids::SEARCH, "请输入好友的用户名！")
            .map_err(|e| reject_invalid(&self.ctx.host, e))?;

        let body = FriendRequest { to_user_username: username };
        run_mutation_with(
            &self.ctx,
            self.ctx.client.send::<_, Value>(Method::Post, FRIENDSHIPS_PATH, &body),
            "好友请求已发送！",
            "发送失败: ",
        )
        .await?;

        self.ctx.host.set_value(ids::SEARCH, "");
        self.load_relationships().await;
        Ok(())
    }

    pub async fn handle(&self, action: RowAction) -> ActionResult {
        match action {
            RowAction::Accept(id) => self.accept(id).await,
            RowAction::Reject(id) => self.remove(id, "确定要拒绝这个好友请求吗？").await,
            RowAction::Delete(id) => self.remove(id, "确定要删除这位好友吗？").await,
            _ => Ok(()),
        }
    }

    pub async fn accept(&self, id: u64) -> ActionResult {
        let path = format!("{}{}/accept/", FRIENDSHIPS_PATH, id);
        run_mutation(
            &self.ctx,
            self.ctx.client.send_empty::<Value>(Method::Put, &path),
            "已添加为好友！",
        )
        .await?;
        self.reconcile().await;
        Ok(())
    }

    async fn remove(&self, id: u64, question: &str) -> ActionResult {
        if !confirmed(&self.ctx.host, question) {
            return Err(ActionError::Cancelled);
        }
        let path = format!("{}{}/", FRIENDSHIPS_PATH, id);
        run_mutation(&self.ctx, self.ctx.client.delete(&path), "操作成功！").await?;
        self.reconcile().await;
        Ok(())
    }

    /// Whether the other party may see my records. The list is reloaded
    /// afterwards either way so the switch matches the server.
    pub async fn set_permission(&self, id: u64, can_view: bool) -> ActionResult {
        let path = format!("{}{}/set-permission/", FRIENDSHIPS_PATH, id);
        let result = run_mutation_with(
            &self.ctx,
            self.ctx.client.send::<_, Value>(Method::Put, &path, &PermissionUpdate { can_view }),
            "权限已更新！",
            "权限更新失败: ",
        )
        .await;

        self.load_relationships().await;
        result?;
        Ok(())
    }

    /// Post a comment and reload only that entry's comments
    pub async fn comment(&self, form: &FormValues) -> ActionResult {
        let input = CommentInput::from_form(form).map_err(|e| reject_invalid(&self.ctx.host, e))?;

        let posted = self
            .ctx
            .client
            .send::<_, Value>(Method::Post, COMMENTS_PATH, &input)
            .await;
        if let Err(e) = posted {
            if e.is_auth() {
                escalate_auth(&self.ctx, &e.user_message());
            } else {
                warn!(error = %e, "comment rejected");
                self.ctx.host.notify(Notice::danger("评论失败！"));
            }
            return Err(e.into());
        }

        self.load_comments(&FeedKind::from_tag(&input.content_type), input.object_id).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use serde_json::json;

    fn signed_in() -> Harness {
        let harness = Harness::new();
        CurrentUser { user_id: 2, username: "bob".into() }.save(harness.durable.as_ref());
        harness
    }

    fn friendship(status: &str, from: (u64, &str), to: (u64, &str)) -> Value {
        json!({
            "status": status,
            "from_user_info": {"id": from.0, "username": from.1},
            "to_user_info": {"id": to.0, "username": to.1},
            "from_user_can_be_viewed": true,
            "to_user_can_be_viewed": false
        })
    }

    #[test]
    fn test_feed_kind_table() {
        assert_eq!(FeedKind::from_tag("sportrecord"), FeedKind::SportRecord);
        assert_eq!(FeedKind::SportRecord.label(), "运动");
        assert_eq!(FeedKind::Meal.tag(), "meal");

        let other = FeedKind::from_tag("recipe");
        assert_eq!(other, FeedKind::Other("recipe".into()));
        assert_eq!(other.tag(), "recipe");
        assert_eq!(other.label(), "动态");

        let query = FeedKind::SleepRecord.comment_query(9);
        assert_eq!(query[0], ("content_type_model", "sleeprecord".to_string()));
        assert_eq!(query[1], ("object_id", "9".to_string()));
    }

    #[tokio::test]
    async fn test_missing_user_stops_loading() {
        let harness = Harness::new();
        let page = FriendsPage::new(harness.ctx.clone());

        page.reconcile().await;
        assert!(harness.host.rendered(ids::FEED).unwrap().contains(MISSING_USER));
        assert!(harness.backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_lists_from_my_perspective() {
        let harness = signed_in();
        harness.backend.seed("friendships", friendship("accepted", (1, "alice"), (2, "bob")));
        harness.backend.seed("friendships", friendship("pending", (3, "carol"), (2, "bob")));
        harness.backend.seed("friendships", friendship("pending", (2, "bob"), (4, "dave")));
        let page = FriendsPage::new(harness.ctx.clone());

        page.reconcile().await;

        let friends = harness.host.rendered(ids::FRIENDS).unwrap();
        assert!(friends.contains("<span>alice</span>"));
        assert!(friends.contains("未授权"));

        let requests = harness.host.rendered(ids::REQUESTS).unwrap();
        assert!(requests.contains("carol"));
        assert!(!requests.contains("dave"));
        assert!(harness.host.rendered(ids::FEED).unwrap().contains("好友们很安静"));
    }

    #[tokio::test]
    async fn test_accept_and_reject() {
        let harness = signed_in();
        harness.backend.seed("friendships", friendship("pending", (3, "carol"), (2, "bob")));
        harness.backend.seed("friendships", friendship("pending", (5, "erin"), (2, "bob")));
        let page = FriendsPage::new(harness.ctx.clone());

        page.handle(RowAction::Accept(1)).await.unwrap();
        assert_eq!(harness.backend.last_request(Method::Put).unwrap().path, "/api/friendships/1/accept/");
        assert!(harness.host.rendered(ids::FRIENDS).unwrap().contains("carol"));

        page.handle(RowAction::Reject(2)).await.unwrap();
        assert_eq!(harness.backend.last_request(Method::Delete).unwrap().path, "/api/friendships/2/");
        assert!(harness.host.rendered(ids::REQUESTS).unwrap().contains("暂无新的好友请求"));
        assert_eq!(harness.host.last_notice().unwrap().message, "操作成功！");
    }

    #[tokio::test]
    async fn test_send_request_failure_prefix() {
        let harness = signed_in();
        harness.backend.respond(Method::Post, FRIENDSHIPS_PATH, 400, r#"{"message": "用户不存在"}"#);
        let page = FriendsPage::new(harness.ctx.clone());

        let form = FormValues::new().with(ids::SEARCH, "nobody");
        assert!(page.send_request(&form).await.is_err());
        assert_eq!(harness.host.last_notice().unwrap().message, "发送失败: 用户不存在");
    }

    #[tokio::test]
    async fn test_permission_toggle_reloads_from_server() {
        let harness = signed_in();
        harness.backend.seed("friendships", friendship("accepted", (1, "alice"), (2, "bob")));
        let page = FriendsPage::new(harness.ctx.clone());
        page.load_relationships().await;
        let before = harness.backend.requests().len();

        page.set_permission(1, true).await.unwrap();
        let log = harness.backend.requests();
        let put = &log[before];
        assert_eq!(put.method, Method::Put);
        assert_eq!(put.path, "/api/friendships/1/set-permission/");
        assert_eq!(put.body.clone().unwrap(), json!({"can_view": true}));
        let reload = &log[before + 1];
        assert_eq!(reload.method, Method::Get);
        assert_eq!(reload.path, FRIENDSHIPS_PATH);
        assert_eq!(reload.query_value("status"), Some("accepted"));
        assert_eq!(harness.host.last_notice().unwrap().message, "权限已更新！");

        // The switch shows what the server stored, not what was requested
        assert!(harness.host.rendered(ids::FRIENDS).unwrap().contains("未授权"));
    }

    #[tokio::test]
    async fn test_permission_failure_reloads() {
        let harness = signed_in();
        harness.backend.seed("friendships", friendship("accepted", (1, "alice"), (2, "bob")));
        harness.backend.respond(Method::Put, "/api/friendships/1/set-permission/", 400, r#"{"message": "无权操作"}"#);
        let page = FriendsPage::new(harness.ctx.clone());

        assert!(page.set_permission(1, true).await.is_err());
        assert_eq!(harness.host.last_notice().unwrap().message, "权限更新失败: 无权操作");
        let get = harness.backend.last_request(Method::Get).unwrap();
        assert_eq!(get.path, FRIENDSHIPS_PATH);
        assert!(harness.host.rendered(ids::FRIENDS).unwrap().contains("未授权"));
    }

    #[tokio::test]
    async fn test_feed_with_comments() {
        let harness = signed_in();
        harness.backend.seed(
            "feed",
            json!({"content_type_model": "sportrecord", "object_id": 7, "user": {"username": "alice"}, "timestamp": "2024-05-01T18:30:00+08:00", "content": "跑步 30 分钟"}),
        );
        harness.backend.seed(
            "comments",
            json!({"content_type_model": "sportrecord", "object_id": 7, "author_username": "bob", "text": "<b>厉害</b>"}),
        );
        let page = FriendsPage::new(harness.ctx.clone());

        page.load_feed().await;
        let feed = harness.host.rendered(ids::FEED).unwrap();
        assert!(feed.contains("2024-05-01 18:30"));
        assert!(feed.contains("运动"));
        assert!(feed.contains(r#"id="comments-for-sportrecord-7""#));

        let comments = harness.host.rendered("comments-for-sportrecord-7").unwrap();
        assert!(comments.contains("&lt;b&gt;厉害&lt;/b&gt;"));

        let form = FormValues::new()
            .with(ids::COMMENT_TYPE, "sportrecord")
            .with(ids::COMMENT_OBJECT, "7")
            .with(ids::COMMENT_TEXT, "加油");
        page.comment(&form).await.unwrap();
        let post = harness.backend.last_request(Method::Post).unwrap();
        assert_eq!(post.body.unwrap(), json!({"content_type": "sportrecord", "object_id": 7, "text": "加油"}));
        let reload = harness.backend.last_request(Method::Get).unwrap();
        assert_eq!(reload.path, COMMENTS_PATH);
        assert_eq!(reload.query_value("object_id"), Some("7"));
    }

    #[tokio::test]
    async fn test_feed_failure_degrades() {
        let harness = signed_in();
        harness.backend.respond(Method::Get, FEED_PATH, 500, "");
        let page = FriendsPage::new(harness.ctx.clone());

        page.load_feed().await;
        assert!(harness.host.rendered(ids::FEED).unwrap().contains("无法加载好友动态"));
    }

    #[tokio::test]
    async fn test_comment_failure_notice() {
        let harness = signed_in();
        harness.backend.respond(Method::Post, COMMENTS_PATH, 400, "{}");
        let page = FriendsPage::new(harness.ctx.clone());

        let form = FormValues::new()
            .with(ids::COMMENT_TYPE, "meal")
            .with(ids::COMMENT_OBJECT, "3")
            .with(ids::COMMENT_TEXT, "不错");
        assert!(page.comment(&form).await.is_err());
        assert_eq!(harness.host.last_notice().unwrap().message, "评论失败！");
    }
}
