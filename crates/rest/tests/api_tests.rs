//! HTTP surface tests over the built-in forms.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use common::{UnavailableStore, choice_values, ids, server, server_with};

mod probes {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let server = server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "memory");
    }

    #[tokio::test]
    async fn test_liveness_and_readiness() {
        let server = server();
        server.get("/_liveness").await.assert_status_ok();
        server.get("/_readiness").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_readiness_reports_store_failure() {
        let server = server_with(Arc::new(UnavailableStore));
        let response = server.get("/_readiness").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json::<Value>()["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_type_index() {
        let server = server();
        let response = server.get("/api/_types").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let types = body["resource_types"].as_array().unwrap();
        assert_eq!(types.len(), 34);
        assert!(
            types
                .iter()
                .any(|t| t["name"] == "tagged-item" && t["filterable"] == false)
        );
    }
}

mod lists {
    use super::*;

    #[tokio::test]
    async fn test_filter_by_region() {
        let server = server();
        let response = server.get("/api/site").add_query_param("region_id", "region-42").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["count"], 2);
        assert_eq!(ids(&body), ["site-a", "site-b"]);
    }

    #[tokio::test]
    async fn test_repeated_values_are_membership() {
        let server = server();
        let response = server
            .get("/api/rack")
            .add_query_params(&[("status", "active"), ("status", "planned")])
            .await;
        response.assert_status_ok();
        assert_eq!(ids(&response.json()), ["rack-1", "rack-2", "rack-3"]);
    }

    #[tokio::test]
    async fn test_blank_values_do_not_filter() {
        let server = server();
        let response = server
            .get("/api/rack")
            .add_query_params(&[("status", ""), ("site_id", "")])
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["count"], 3);
    }

    #[tokio::test]
    async fn test_text_filter_is_case_insensitive() {
        let server = server();
        let response = server.get("/api/rack").add_query_param("serial", "AB12").await;
        response.assert_status_ok();
        assert_eq!(ids(&response.json()), ["rack-1"]);
    }

    #[tokio::test]
    async fn test_null_option_matches_missing_location() {
        let server = server();
        let response = server.get("/api/rack").add_query_param("location_id", "null").await;
        response.assert_status_ok();
        assert_eq!(ids(&response.json()), ["rack-2"]);
    }

    #[tokio::test]
    async fn test_paging_and_ordering() {
        let server = server();
        let response = server
            .get("/api/rack")
            .add_query_params(&[("limit", "2"), ("ordering", "-label")])
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["count"], 3);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["next_offset"], 2);
        assert_eq!(ids(&body), ["rack-3", "rack-2"]);

        let response = server
            .get("/api/rack")
            .add_query_params(&[("limit", "2"), ("offset", "2"), ("ordering", "-label")])
            .await;
        let body: Value = response.json();
        assert_eq!(ids(&body), ["rack-1"]);
        assert!(body.get("next_offset").is_none());
    }

    #[tokio::test]
    async fn test_limit_clamped_to_max() {
        let server = server();
        let response = server.get("/api/rack").add_query_param("limit", "100000").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["limit"], 100);
    }

    #[tokio::test]
    async fn test_unfiltered_type_ignores_filters() {
        let server = server();
        let response = server
            .get("/api/config-revision")
            .add_query_param("anything", "x")
            .await;
        response.assert_status_ok();
        assert_eq!(ids(&response.json()), ["rev-1"]);
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_invalid_filters_report_fields() {
        let server = server();
        let response = server
            .get("/api/rack")
            .add_query_params(&[("status", "bogus"), ("weight", "heavy")])
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "invalid");
        assert!(body["error"]["fields"]["status"].is_array());
        assert!(body["error"]["fields"]["weight"].is_array());
    }

    #[tokio::test]
    async fn test_invalid_paging() {
        let server = server();
        let response = server.get("/api/rack").add_query_param("offset", "-5").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].get("fields").is_none());

        let response = server.get("/api/rack").add_query_param("ordering", "label;drop").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let server = server();
        let response = server.get("/api/spaceship").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"]["code"], "not-found");
    }

    #[tokio::test]
    async fn test_store_failure() {
        let server = server_with(Arc::new(UnavailableStore));
        let response = server.get("/api/site").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["error"]["code"], "exception");
    }
}

mod records {
    use super::*;

    #[tokio::test]
    async fn test_read() {
        let server = server();
        let response = server.get("/api/site/site-a").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["label"], "Alpha DC");
        assert_eq!(body["attributes"]["region_id"], "region-42");
    }

    #[tokio::test]
    async fn test_read_missing() {
        let server = server();
        let response = server.get("/api/site/site-z").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert!(
            response.json::<Value>()["error"]["detail"]
                .as_str()
                .unwrap()
                .contains("site-z")
        );
    }
}

mod forms {
    use super::*;

    #[tokio::test]
    async fn test_form_description() {
        let server = server();
        let response = server.get("/api/rack/_form").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["resource_type"], "rack");
        assert!(body["fields"].as_array().unwrap().iter().any(|f| f["name"] == "site_id"));
        assert!(!body["dependencies"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_form_missing() {
        let server = server();
        server
            .get("/api/config-revision/_form")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server.get("/api/spaceship/_form").await.assert_status(StatusCode::NOT_FOUND);
    }
}

mod choices {
    use super::*;

    #[tokio::test]
    async fn test_parent_restricts_choices() {
        let server = server();
        let response = server
            .get("/api/rack/_choices/site_id")
            .add_query_param("region_id", "region-42")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["field"], "site_id");
        assert_eq!(choice_values(&body), ["site-a", "site-b"]);
    }

    #[tokio::test]
    async fn test_cleared_parent_restores_full_set() {
        let server = server();
        let response = server
            .get("/api/rack/_choices/site_id")
            .add_query_param("region_id", "")
            .await;
        response.assert_status_ok();
        assert_eq!(choice_values(&response.json()), ["site-a", "site-b", "site-c"]);
    }

    #[tokio::test]
    async fn test_search_text() {
        let server = server();
        let response = server
            .get("/api/rack/_choices/site_id")
            .add_query_param("q", "charlie")
            .await;
        response.assert_status_ok();
        assert_eq!(choice_values(&response.json()), ["site-c"]);
    }

    #[tokio::test]
    async fn test_null_option_listed_first() {
        let server = server();
        let response = server
            .get("/api/rack/_choices/location_id")
            .add_query_param("site_id", "site-c")
            .await;
        response.assert_status_ok();
        assert_eq!(choice_values(&response.json()), ["null", "loc-c1"]);
    }

    #[tokio::test]
    async fn test_text_field_has_no_choices() {
        let server = server();
        let response = server.get("/api/rack/_choices/serial").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["code"], "not-supported");
    }

    #[tokio::test]
    async fn test_unknown_field() {
        let server = server();
        server
            .get("/api/rack/_choices/nope")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
