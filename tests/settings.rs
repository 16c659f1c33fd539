//! Building a router from a settings file.

use hashroute::config::parse_settings;
use hashroute::{handler, Router, Verb};

const SETTINGS: &str = r#"
[router]
virtual_root = "/app"
hash_mode = true
debug = false

[listener]
request = "app.navigate"
dispatch_event = "app.dispatched"

[[routes]]
pattern = "/home"

[[routes]]
verb = "post"
pattern = "/login"
name = "login"
"#;

#[test]
fn test_router_from_settings() {
    let settings = parse_settings(SETTINGS).unwrap();
    let router = Router::builder().settings(&settings).build();

    let config = router.config();
    assert_eq!(config.virtual_root, "/app");
    assert!(config.hash_mode);
    assert!(!config.enabled);

    let bindings = router.bindings();
    assert_eq!(bindings.request, "app.navigate");
    assert_eq!(bindings.click, "touchclick");

    for route in &settings.routes {
        assert!(router.register(
            &route.verb,
            Some(&route.pattern),
            vec![handler(|req, res, next| next.run(req, res))],
        ));
    }

    let routes = router.routes();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].verb, Verb::Get);
    assert_eq!(routes[1].verb, Verb::Post);
    assert_eq!(routes[1].pattern, "/login");
}

#[test]
fn test_invalid_settings_are_rejected() {
    let err = parse_settings("[router]\nvirtual_root = \"app\"\n").unwrap_err();
    assert!(err.to_string().contains("virtual_root"));
}
