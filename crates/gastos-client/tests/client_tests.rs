// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use gastos_app::QueryModel;
use gastos_client::Client;
use std::thread;
use std::time::Duration;
use time::{Date, Month};
use tiny_http::{Header, Response, Server};

fn json_response(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(200)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn fetch_error_contains_actionable_remediation() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .fetch_page(&QueryModel::default())
        .expect_err("fetch should fail for unreachable endpoint");
    assert!(error.to_string().contains("expenses API"));
}

#[test]
fn fetch_page_sends_the_full_query_and_decodes_the_page() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/expenses?sort=date&direction=dsc&page=1&per_page=100&search=&group_id=trip"
        );
        let body = concat!(
            r#"{"expenses":[{"id":"e-1","title":"Coffee","amount_cents":475,"#,
            r#""category":"Food","date":"2026-03-09"}],"total":27}"#,
        );
        request
            .respond(json_response(body))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let page = client.fetch_page(&QueryModel::for_group("trip"))?;
    assert_eq!(page.total, 27);
    assert_eq!(page.expenses.len(), 1);

    let expense = &page.expenses[0];
    assert_eq!(expense.id.as_str(), "e-1");
    assert_eq!(expense.title, "Coffee");
    assert_eq!(expense.amount_cents, 475);
    assert_eq!(expense.category, "Food");
    assert_eq!(
        expense.date,
        Date::from_calendar_date(2026, Month::March, 9)?
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_page_repeats_the_category_parameter() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/expenses?sort=date&direction=dsc&page=1&per_page=100&search=&group_id=\
             &category=Food&category=Travel"
        );
        request
            .respond(json_response(r#"{"expenses":[],"total":0}"#))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let mut query = QueryModel::default();
    query.set_category_filter(vec!["Food".to_owned(), "Travel".to_owned()]);
    let page = client.fetch_page(&query)?;
    assert!(page.expenses.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn server_error_envelope_surfaces_in_the_message() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string(r#"{"error":"database unavailable"}"#)
            .with_status_code(500)
            .with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_page(&QueryModel::default())
        .expect_err("server error should surface");
    assert_eq!(error.to_string(), "server error (500): database unavailable");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_categories_decodes_the_envelope() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/categories");
        request
            .respond(json_response(r#"{"categories":["Food","Travel","Rent"]}"#))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let categories = client.list_categories()?;
    assert_eq!(
        categories,
        vec!["Food".to_owned(), "Travel".to_owned(), "Rent".to_owned()]
    );

    handle.join().expect("server thread should join");
    Ok(())
}
