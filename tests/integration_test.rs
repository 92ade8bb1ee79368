use llm_dispatch::{
    enforce, normalize, resolve, Capabilities, Error, GenerateRequest, Message, OllamaProvider,
    Provider, Role, RuntimeConfig, RuntimeKind, OLLAMA_LOCAL_ENDPOINT,
};

#[test]
fn test_request_from_json_through_normalize() {
    let request = GenerateRequest::from_json(
        r#"{
            "model": "m",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"}
            ],
            "runtime": {"kind": "url", "endpoint": "http://example.com", "headers": {"x-api-key": "k"}},
            "options": {"max_tokens": 8, "stop": ["\n\n"]}
        }"#,
    )
    .unwrap();

    let internal = normalize(&request).unwrap();
    assert_eq!(internal.model(), "m");
    assert_eq!(internal.messages()[0].role(), Role::System);
    assert_eq!(internal.messages()[1].content(), "hi");
    assert_eq!(internal.max_tokens(), Some(8));

    let runtime = request.runtime.unwrap();
    assert_eq!(runtime.kind, RuntimeKind::Url);
    assert_eq!(runtime.headers.get("x-api-key").map(String::as_str), Some("k"));
}

#[test]
fn test_unknown_role_is_named() {
    let request = GenerateRequest::new("m", vec![Message::new("tool", "result")]);

    let err = normalize(&request).unwrap_err();
    match err {
        Error::Validation { field, message } => {
            assert_eq!(field, "messages[0].role");
            assert!(message.contains("tool"));
        }
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

#[test]
fn test_unknown_runtime_kind() {
    let err = GenerateRequest::from_json(
        r#"{
            "model": "m",
            "messages": [{"role": "user", "content": "hi"}],
            "runtime": {"kind": "grpc", "endpoint": "http://x"}
        }"#,
    )
    .unwrap_err();
    assert_eq!(err.code(), "unresolved_runtime");
    assert!(matches!(err, Error::UnresolvedRuntime(ref message) if message.contains("grpc")));

    // Message validation still runs first.
    let err = GenerateRequest::from_json(
        r#"{"model": "m", "messages": [], "runtime": {"kind": "grpc"}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    let err = "grpc".parse::<RuntimeKind>().unwrap_err();
    assert!(matches!(err, Error::UnresolvedRuntime(_)));
}

#[test]
fn test_resolution_and_enforcement() {
    let request = normalize(&GenerateRequest::new("m", vec![Message::user("hi")])).unwrap();

    let generic = resolve(Some(&RuntimeConfig::url("http://example.com")), "m").unwrap();
    assert_eq!(
        generic.describe(),
        Capabilities {
            streaming: true,
            tools: false,
            json: true,
            max_tokens: None,
        }
    );
    assert!(enforce(generic.as_ref(), &request, true).is_ok());

    let kernel = resolve(Some(&RuntimeConfig::kernel()), "m").unwrap();
    assert_eq!(kernel.describe(), Capabilities::default());
    assert!(enforce(kernel.as_ref(), &request, false).is_ok());
    assert!(enforce(kernel.as_ref(), &request, true).is_err());
}

#[test]
fn test_ollama_local_defaults() {
    let provider = OllamaProvider::local().unwrap();

    assert_eq!(provider.id(), "ollama");
    assert_eq!(provider.endpoint(), OLLAMA_LOCAL_ENDPOINT);
    assert!(provider.describe().streaming);
    assert!(!provider.describe().tools);
}

#[test]
fn test_error_classification() {
    let status = Error::HttpStatus {
        url: "http://x".to_string(),
        status: 429,
        body: String::new(),
    };
    assert!(status.is_retryable());
    assert_eq!(status.code(), "transport_error");

    let validation = Error::validation("messages", "must not be empty");
    assert!(!validation.is_retryable());
    assert_eq!(validation.provider_id(), None);
}
