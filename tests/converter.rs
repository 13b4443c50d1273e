use anyhow::Result;
use http::StatusCode;
use pretty_assertions::assert_eq;
use restcapture::converter::ResponseConverter;
use restcapture::cookie::ResponseCookie;
use restcapture::exchange::in_memory::{InMemoryClient, Router, ServerResponse};
use restcapture::headers::SET_COOKIE;
use restcapture::media_type::MediaType;

fn client_for(router: Router) -> Result<InMemoryClient> {
    InMemoryClient::bind(router).base_url("http://localhost")
}

#[test]
fn basic_response() -> Result<()> {
    let client = client_for(
        Router::new().get("/foo", |_| ServerResponse::ok().body_text("Hello, World!").build()),
    )?;
    let exchange = client.get("/foo")?;

    let response = ResponseConverter::raw().convert(&exchange);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.content_as_string(), "Hello, World!");
    assert_eq!(
        response.content_type()?,
        Some(MediaType::parse("text/plain;charset=UTF-8")?)
    );
    assert_eq!(response.content_length(), Some(13));
    Ok(())
}

#[test]
fn response_with_cookie() -> Result<()> {
    let client = client_for(Router::new().get("/foo", |_| {
        let cookie = ResponseCookie::from("name", "value")
            .domain("localhost")
            .http_only(true)
            .build();
        ServerResponse::ok().cookie(&cookie).build()
    }))?;
    let exchange = client.get("/foo")?;

    let response = ResponseConverter::raw().convert(&exchange);

    assert_eq!(response.headers().len(), 1);
    assert_eq!(
        response.headers().get(SET_COOKIE),
        Some(&["name=value; Domain=localhost; HttpOnly".to_string()][..])
    );
    assert_eq!(response.cookies().len(), 1);
    Ok(())
}

#[test]
fn response_with_non_standard_status_code() -> Result<()> {
    let client = client_for(Router::new().get("/foo", |_| ServerResponse::status(210).build()))?;
    let exchange = client.get("/foo")?;

    let response = ResponseConverter::raw().convert(&exchange);

    assert_eq!(response.status_code(), 210);
    assert!(!response.status().is_standard());
    Ok(())
}

#[test]
fn standard_binding_agrees_on_registered_codes() -> Result<()> {
    let client = client_for(Router::new().get("/foo", |_| ServerResponse::status(404).build()))?;
    let exchange = client.get("/foo")?;

    let standard = ResponseConverter::standard().convert(&exchange);
    let raw = ResponseConverter::raw().convert(&exchange);

    assert_eq!(standard, raw);
    assert_eq!(standard.status().reason_phrase(), Some("Not Found"));
    Ok(())
}

#[test]
fn converting_twice_yields_equal_responses() -> Result<()> {
    let client = client_for(Router::new().get("/foo", |_| {
        ServerResponse::ok()
            .header("X-Trace", "1")
            .body_text("twice")
            .build()
    }))?;
    let exchange = client.get("/foo")?;
    let converter = ResponseConverter::raw();

    assert_eq!(converter.convert(&exchange), converter.convert(&exchange));
    Ok(())
}

#[test]
fn multi_valued_headers_keep_every_value() -> Result<()> {
    let client = client_for(Router::new().get("/foo", |_| {
        ServerResponse::ok()
            .header("Vary", "Accept")
            .header("Vary", "Origin")
            .cookie(&ResponseCookie::from("a", "1").build())
            .cookie(&ResponseCookie::from("b", "2").path("/").build())
            .body_bytes(vec![0u8, 1, 2])
            .build()
    }))?;
    let exchange = client.get("/foo")?;

    let response = ResponseConverter::raw().convert(&exchange);

    assert_eq!(
        response.headers().get("vary"),
        Some(&["Accept".to_string(), "Origin".to_string()][..])
    );
    assert_eq!(
        response.headers().get(SET_COOKIE),
        Some(&["a=1".to_string(), "b=2; Path=/".to_string()][..])
    );
    assert_eq!(response.content(), &[0u8, 1, 2][..]);
    assert_eq!(response.content_length(), Some(3));
    Ok(())
}
