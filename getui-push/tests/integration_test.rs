//! Integration tests against a mock GeTui server.

use chrono::NaiveDate;
use getui_push::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP: &str = "app-id";

fn config(server: &MockServer) -> GetuiConfig {
    GetuiConfig::new(APP, "app-key", "master-secret").base_url(format!("{}/v1", server.uri()))
}

async fn mount_auth(server: &MockServer, expire_time: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/auth_sign", APP)))
        .and(body_partial_json(json!({ "appkey": "app-key" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "expire_time": expire_time,
            "auth_token": "tok-123",
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn client(server: &MockServer) -> GetuiClient {
    mount_auth(server, "86400", 1).await;
    GetuiClient::new(config(server)).await.unwrap()
}

fn notification(cid: &str) -> PushRequest {
    PushRequest::new(NotificationTemplate::new(SystemStyle::new("T", "B"))).cid(cid)
}

// ========== Authentication ==========

#[tokio::test]
async fn test_auth_sends_signature() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let timestamp = body["timestamp"].as_str().unwrap();
    let expected = sign("app-key", timestamp.parse().unwrap(), "master-secret");
    assert_eq!(body["sign"], expected);
    assert_eq!(client.token().await.unwrap(), "tok-123");
}

#[tokio::test]
async fn test_auth_sign_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/auth_sign", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "sign_error" })))
        .mount(&server)
        .await;

    let err = GetuiClient::new(config(&server)).await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.result_code(), Some(&ResultCode::SignError));
}

#[tokio::test]
async fn test_auth_undecodable_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/auth_sign", APP)))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = GetuiClient::new(config(&server)).await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_auth_transport_failure() {
    let config = GetuiConfig::new(APP, "app-key", "master-secret")
        .base_url("http://127.0.0.1:1/v1")
        .connect_timeout(Duration::from_secs(2));

    let err = GetuiClient::new(config).await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.result_code(), Some(&ResultCode::Missing));
}

#[tokio::test]
async fn test_concurrent_callers_refresh_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/auth_sign", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "expire_time": "30",
            "auth_token": "old",
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/auth_sign", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "expire_time": "86400",
            "auth_token": "new",
        })))
        .mount(&server)
        .await;

    let client = GetuiClient::new(config(&server)).await.unwrap();
    let handles: Vec<_> = (0..20)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.token().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "new");
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_token_refreshed_near_expiry() {
    let server = MockServer::start().await;
    // Shorter than the default refresh margin, so every call re-authenticates.
    mount_auth(&server, "30", 2).await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/{}/user_status/c1", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "cid": "c1",
            "status": "online",
            "lastlogin": 1714525200000u64,
        })))
        .mount(&server)
        .await;

    let client = GetuiClient::new(config(&server)).await.unwrap();
    let status = client.user_status("c1").await.unwrap();
    assert!(status.is_online());
    assert_eq!(status.lastlogin, "1714525200000");
}

#[tokio::test]
async fn test_forced_refresh() {
    let server = MockServer::start().await;
    mount_auth(&server, "86400", 2).await;

    let client = GetuiClient::new(config(&server)).await.unwrap();
    client.refresh_token().await.unwrap();
    assert_eq!(client.token().await.unwrap(), "tok-123");
}

// ========== Delivery ==========

#[tokio::test]
async fn test_push_single() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/push_single", APP)))
        .and(header("authtoken", "tok-123"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "message": { "appkey": "app-key", "msgtype": "notification" },
            "notification": { "style": { "type": 0, "title": "T", "text": "B" } },
            "cid": "C1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "taskid": "OSS-1",
            "status": "successed_online",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut push = notification("C1").alias("ignored");
    let result = client.push_single(&mut push).await.unwrap();
    assert_eq!(result.taskid, "OSS-1");
    assert_eq!(result.status, ResultCode::SuccessOnline);
    assert!(!push.requestid().is_empty());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert!(body.get("alias").is_none());
    assert_eq!(body["requestid"], push.requestid());
}

#[tokio::test]
async fn test_push_single_provider_rejection() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/push_single", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "no_user",
            "desc": "cid unknown",
        })))
        .mount(&server)
        .await;

    let result = client.push_single(&mut notification("C1")).await.unwrap();
    assert_eq!(result.result, ResultCode::NoUser);

    let err = result.ok_or_rejected().unwrap_err();
    assert!(matches!(err, PushError::Rejected { code: ResultCode::NoUser, .. }));
}

#[tokio::test]
async fn test_push_single_batch() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/push_single_batch", APP)))
        .and(body_partial_json(json!({ "need_detail": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "taskid": "batch-1",
        })))
        .mount(&server)
        .await;

    let mut pushes = vec![notification("c1"), notification("c2")];
    let result = client.push_single_batch(&mut pushes, true).await.unwrap();
    assert_eq!(result.taskid, "batch-1");
    assert!(pushes.iter().all(|p| !p.requestid().is_empty()));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(body["msg_list"].as_array().unwrap().len(), 2);
    assert_eq!(body["msg_list"][1]["cid"], "c2");
}

#[tokio::test]
async fn test_list_push_flow() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/save_list_body", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "taskid": "list-1",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/push_list", APP)))
        .and(body_json(json!({
            "cid": ["c1", "c2"],
            "taskid": "list-1",
            "need_detail": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "taskid": "list-1",
            "cid_details": { "c1": "successed_online", "c2": "successed_offline" },
        })))
        .mount(&server)
        .await;

    let mut body = PushRequest::new(TransmissionTemplate::new("payload"));
    let task = client.save_list_body(&mut body).await.unwrap();

    let list = PushList::to_cids(task.taskid, ["c1", "c2"]).with_detail();
    let result = client.push_list(&list).await.unwrap();
    assert_eq!(result.cid_details["c2"], ResultCode::SuccessOffline);
}

#[tokio::test]
async fn test_push_app_with_conditions() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/push_app", APP)))
        .and(body_partial_json(json!({
            "condition": [{ "key": "phonetype", "values": ["ANDROID"], "opt_type": 0 }],
            "speed": 100,
            "task_name": "spring-sale",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "taskid": "app-1",
        })))
        .mount(&server)
        .await;

    let mut push = PushRequest::new(LinkTemplate::new("https://example.com", SystemStyle::new("Sale", "Now")))
        .condition(Condition::phone_type(["ANDROID"]))
        .speed(100)
        .task_name("spring-sale");
    let result = client.push_app(&mut push).await.unwrap();
    assert_eq!(result.taskid, "app-1");
}

#[tokio::test]
async fn test_task_management() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v1/{}/stop_task/task-9", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "taskid": "task-9",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/get_schedule_task", APP)))
        .and(body_json(json!({ "taskid": "task-9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "taskid": "task-9",
            "taskDetail": { "pushContent": "hi", "sendResult": "waiting" },
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/del_schedule_task", APP)))
        .and(body_json(json!({ "taskid": "task-9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .mount(&server)
        .await;

    assert_eq!(client.stop_task("task-9").await.unwrap().taskid, "task-9");
    let schedule = client.get_schedule_task("task-9").await.unwrap();
    assert_eq!(schedule.task_detail.unwrap().send_result, "waiting");
    assert!(client.del_schedule_task("task-9").await.unwrap().result.is_ok());
}

#[tokio::test]
async fn test_empty_path_parameter_sends_nothing() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    for err in [
        client.stop_task("").await.unwrap_err(),
        client.get_schedule_task("").await.unwrap_err(),
        client.query_cid("").await.unwrap_err(),
        client.user_status("").await.unwrap_err(),
        client.push_result_by_group_name("").await.unwrap_err(),
    ] {
        assert!(matches!(err, PushError::InvalidRequest(_)));
    }
    // Only the auth request reached the server.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

// ========== Targeting ==========

#[tokio::test]
async fn test_alias_operations() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/bind_alias", APP)))
        .and(body_json(json!({ "alias_list": [{ "cid": "c1", "alias": "lee" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/{}/query_cid/lee", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "cid": ["c1"],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/{}/query_alias/c1", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "alias": "lee",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/unbind_alias", APP)))
        .and(body_json(json!({ "cid": "c1", "alias": "lee" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/unbind_alias_all", APP)))
        .and(body_json(json!({ "alias": "lee" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "alias_error",
            "desc": "alias not bound",
        })))
        .mount(&server)
        .await;

    assert!(client.bind_single_alias("lee", "c1").await.unwrap().result.is_ok());
    assert_eq!(client.query_cid("lee").await.unwrap().cid, vec!["c1"]);
    assert_eq!(client.query_alias("c1").await.unwrap().alias, "lee");
    assert!(client.unbind_alias("c1", "lee").await.unwrap().result.is_ok());

    let result = client.unbind_alias_all("lee").await.unwrap();
    assert_eq!(result.result, ResultCode::AliasError);
    assert_eq!(result.desc, "alias not bound");
}

#[tokio::test]
async fn test_bind_alias_rejects_empty_list() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    let err = client.bind_alias(&[]).await.unwrap_err();
    assert!(matches!(err, PushError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_tags_and_blacklist() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/set_tags", APP)))
        .and(body_json(json!({ "cid": "c1", "tag_list": ["vip", "beta"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/{}/get_tags/c1", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "tags": "vip beta",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/user_blk_list", APP)))
        .and(body_json(json!({ "cid": ["c1", "c2"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/{}/user_blk_list", APP)))
        .and(body_json(json!({ "cid": ["c1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.set_tags("c1", ["vip", "beta"]).await.unwrap().result.is_ok());
    assert_eq!(client.get_tags("c1").await.unwrap().tags, "vip beta");

    let cids = vec!["c1".to_string(), "c2".to_string()];
    assert!(client.add_blacklist(&cids).await.unwrap().result.is_ok());
    assert!(client.remove_blacklist(&cids[..1]).await.unwrap().result.is_ok());
}

// ========== Analytics ==========

#[tokio::test]
async fn test_push_result() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/push_result", APP)))
        .and(body_json(json!({ "taskIdList": ["t1", "t2"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "data": [
                { "taskid": "t1", "msg_total": 5, "GT": { "sent": 5 } },
                { "taskid": "t2", "msg_total": 3, "APN": { "sent": 3 } }
            ],
        })))
        .mount(&server)
        .await;

    let stats = client.push_result(["t1", "t2"]).await.unwrap();
    assert_eq!(stats.data.len(), 2);
    assert_eq!(stats.data[0].gt.sent, 5);
    assert_eq!(stats.data[1].apn.sent, 3);
}

#[tokio::test]
async fn test_push_result_empty_list_sends_nothing() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    let err = client.push_result(Vec::<String>::new()).await.unwrap_err();
    assert!(matches!(err, PushError::InvalidRequest(_)));
    // Only the auth request reached the server.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_daily_statistics() {
    let server = MockServer::start().await;
    let client = client(&server).await;
    let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/query_app_push/20240321", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "data": { "appId": APP, "date": "20240321", "sendCount": 42 },
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/query_app_user/20240321", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "data": { "app_id": APP, "new_regist_count": 7, "online_count": 3 },
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/get_push_result_by_group_name/spring", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "msg_total": 100,
            "click_num": 9,
        })))
        .mount(&server)
        .await;

    assert_eq!(client.query_app_push(date).await.unwrap().data.send_count, 42);
    assert_eq!(
        client.query_app_user(date).await.unwrap().data.new_register_count,
        7
    );
    let group = client.push_result_by_group_name("spring").await.unwrap();
    assert_eq!(group.msg_total, 100);
    assert_eq!(group.click_num, 9);
}

#[tokio::test]
async fn test_user_count_and_bi_tags() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/query_user_count", APP)))
        .and(body_json(json!({
            "condition": [{ "key": "tag", "values": ["vip"], "opt_type": 1 }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "user_count": 1234,
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/query_bi_tags", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "ok",
            "tags": ["active", "payer"],
        })))
        .mount(&server)
        .await;

    let count = client
        .query_user_count(&[Condition::tag(["vip"], ConditionOp::Intersection)])
        .await
        .unwrap();
    assert_eq!(count.user_count, 1234);
    assert_eq!(client.query_bi_tags().await.unwrap().tags, vec!["active", "payer"]);
}

#[tokio::test]
async fn test_set_badge() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/set_badge", APP)))
        .and(body_json(json!({
            "badge": "+1",
            "cid_list": ["c1"],
            "devicetoken_list": [],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .mount(&server)
        .await;

    let result = client.set_badge(&BadgeRequest::new("+1").cids(["c1"])).await.unwrap();
    assert!(result.result.is_ok());

    let err = client.set_badge(&BadgeRequest::new("+1")).await.unwrap_err();
    assert!(matches!(err, PushError::InvalidRequest(_)));
}

// ========== Failure handling ==========

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/{}/query_alias/c1", APP)))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client.query_alias("c1").await.unwrap_err();
    assert_eq!(err.status_code(), Some(502));
    assert!(matches!(err, PushError::Http { body, .. } if body == "bad gateway"));
}

#[tokio::test]
async fn test_error_status_with_provider_result() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/{}/query_alias/c1", APP)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "result": "not_auth",
        })))
        .mount(&server)
        .await;

    let result = client.query_alias("c1").await.unwrap();
    assert_eq!(result.result, ResultCode::NotAuth);
}

#[tokio::test]
async fn test_operation_timeout() {
    let server = MockServer::start().await;
    mount_auth(&server, "86400", 1).await;
    let client = GetuiClient::new(config(&server).timeout(Duration::from_millis(200)))
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/v1/{}/query_alias/c1", APP)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": "ok", "alias": "lee" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.query_alias("c1").await.unwrap_err();
    assert!(matches!(err, PushError::Timeout | PushError::Network(_)));
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/{}/query_alias/c1", APP)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.query_alias("c1").await.unwrap_err();
    assert!(matches!(err, PushError::Serialization(_)));
}
