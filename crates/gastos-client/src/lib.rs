// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use gastos_app::{ExpensePage, QueryModel};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fetch_page(&self, query: &QueryModel) -> Result<ExpensePage> {
        let url = self.expenses_url(query)?;
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode expenses page")
    }

    pub fn list_categories(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/categories", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: CategoriesResponse = response.json().context("decode category list")?;
        Ok(parsed.categories)
    }

    pub fn ping(&self) -> Result<()> {
        self.list_categories()?;
        Ok(())
    }

    fn expenses_url(&self, query: &QueryModel) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/expenses", self.base_url))
            .context("parse expenses endpoint URL")?;
        {
            // search and group_id are sent even when empty; category repeats
            // per selected value.
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("sort", query.sort.as_str())
                .append_pair("direction", query.direction.as_str())
                .append_pair("page", &query.page.to_string())
                .append_pair("per_page", &query.per_page.to_string())
                .append_pair("search", &query.search)
                .append_pair("group_id", &query.group_id);
            for category in &query.category {
                pairs.append_pair("category", category);
            }
        }
        Ok(url)
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!("cannot reach {base_url} -- is the expenses API running? ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response};
    use gastos_app::QueryModel;
    use reqwest::StatusCode;
    use std::time::Duration;

    fn client() -> Client {
        Client::new("http://localhost:8000", Duration::from_secs(1)).expect("client")
    }

    #[test]
    fn new_rejects_an_empty_base_url() {
        let error = Client::new("/", Duration::from_secs(1))
            .expect_err("empty base URL should be rejected");
        assert!(error.to_string().contains("api.base_url"));
    }

    #[test]
    fn new_trims_trailing_slashes() {
        let client = Client::new("http://localhost:8000/", Duration::from_secs(1))
            .expect("client should initialize");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn expenses_url_sends_every_query_field() {
        let url = client()
            .expenses_url(&QueryModel::default())
            .expect("build URL");
        assert_eq!(url.path(), "/expenses");
        assert_eq!(
            url.query(),
            Some("sort=date&direction=dsc&page=1&per_page=100&search=&group_id=")
        );
    }

    #[test]
    fn expenses_url_repeats_the_category_parameter() {
        let mut query = QueryModel::default();
        query.set_category_filter(vec!["Food".to_owned(), "Travel".to_owned()]);
        query.set_search("coffee shop");

        let url = client().expenses_url(&query).expect("build URL");
        assert_eq!(
            url.query(),
            Some(
                "sort=date&direction=dsc&page=1&per_page=100&search=coffee+shop&group_id=\
                 &category=Food&category=Travel"
            )
        );
    }

    #[test]
    fn clean_error_response_prefers_the_api_envelope() {
        let error = clean_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"database unavailable"}"#,
        );
        assert_eq!(
            error.to_string(),
            "server error (500): database unavailable"
        );
    }

    #[test]
    fn clean_error_response_passes_short_plain_bodies_through() {
        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream timeout");
        assert_eq!(error.to_string(), "server error (502): upstream timeout");
    }

    #[test]
    fn clean_error_response_falls_back_to_the_status_code() {
        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":42}"#);
        assert_eq!(error.to_string(), "server returned 500");
    }
}
