//! Route table and hash history behaviour.

use materiales_service::routing::{
    normalize_path, Resolution, Route, RouteError, RouteRef, RouteTarget, HOME_PATH, HOME_ROUTE,
    HOME_VIEW,
};
use materiales_service::{HashHistory, RouteTable};
use std::sync::Arc;

#[test]
fn test_standard_table_resolves_home() {
    let table = RouteTable::standard();
    assert_eq!(table.validate(), Ok(()));

    match table.resolve(HOME_PATH) {
        Resolution::Render { route } => {
            assert_eq!(route.view, HOME_VIEW);
            assert_eq!(route.name.as_deref(), Some(HOME_ROUTE));
        }
        other => panic!("expected render, got {:?}", other),
    }

    match table.resolve("/") {
        Resolution::Redirect { from, to } => {
            assert_eq!(from, "/");
            assert_eq!(to.path, HOME_PATH);
            assert_eq!(to.view, HOME_VIEW);
        }
        other => panic!("expected redirect, got {:?}", other),
    }

    // empty fragment is the root
    assert!(matches!(table.resolve(""), Resolution::Redirect { .. }));
}

#[test]
fn test_matching_ignores_case_trailing_slash_and_query() {
    let table = RouteTable::standard();
    for path in ["/Inicio", "/inicio/", "inicio", "/inicio?tab=1"] {
        assert!(
            matches!(table.resolve(path), Resolution::Render { .. }),
            "{} should render home",
            path
        );
    }
    assert_eq!(normalize_path("/inicio///"), "/inicio");
    assert_eq!(normalize_path("/"), "/");
}

#[test]
fn test_unknown_paths_do_not_match() {
    let table = RouteTable::standard();
    assert_eq!(
        table.resolve("/materiales"),
        Resolution::NotFound {
            path: "/materiales".to_string()
        }
    );
    assert_eq!(
        table.resolve("/inicio/extra"),
        Resolution::NotFound {
            path: "/inicio/extra".to_string()
        }
    );
}

#[test]
fn test_href_for_named_routes() {
    let table = RouteTable::standard();
    assert_eq!(table.href_for("/", HOME_ROUTE).unwrap(), "/#/inicio");
    assert_eq!(table.href_for("/app/", HOME_ROUTE).unwrap(), "/app/#/inicio");
    assert!(matches!(
        table.href_for("/", "materiales"),
        Err(RouteError::NotFound(_))
    ));
}

#[test]
fn test_table_validation() {
    assert!(matches!(
        RouteTable::new(vec![
            Route::view("/a", "a", "ViewA"),
            Route::view("/b", "a", "ViewB"),
        ]),
        Err(RouteError::DuplicateName(name)) if name == "a"
    ));

    assert!(matches!(
        RouteTable::new(vec![
            Route::view("/a", "a", "ViewA"),
            Route::view("/A/", "b", "ViewB"),
        ]),
        Err(RouteError::DuplicatePath(_))
    ));

    assert!(matches!(
        RouteTable::new(vec![Route::redirect_to_name("/", "missing")]),
        Err(RouteError::UnknownRedirectTarget { .. })
    ));

    assert!(matches!(
        RouteTable::new(vec![Route::view("inicio", "home", "ViewHome")]),
        Err(RouteError::InvalidPath(_))
    ));

    let looping = vec![
        Route {
            path: "/a".to_string(),
            name: Some("a".to_string()),
            target: RouteTarget::Redirect(RouteRef::Name("b".to_string())),
        },
        Route {
            path: "/b".to_string(),
            name: Some("b".to_string()),
            target: RouteTarget::Redirect(RouteRef::Path("/a".to_string())),
        },
    ];
    assert!(matches!(
        RouteTable::new(looping),
        Err(RouteError::RedirectLoop(_))
    ));

    let rebuilt = RouteTable::new(RouteTable::standard().routes().to_vec()).unwrap();
    assert_eq!(rebuilt.routes().len(), 2);
}

#[test]
fn test_hash_history_navigation() {
    let table = Arc::new(RouteTable::standard());

    let mut history = HashHistory::start(table.clone(), "/", "http://localhost:5173/");
    assert_eq!(history.len(), 1);
    assert_eq!(history.current().path, HOME_PATH);
    assert_eq!(history.current().view.as_deref(), Some(HOME_VIEW));
    assert_eq!(history.current().href, "/#/inicio");

    let location = history.push("/INICIO/").unwrap();
    assert_eq!(location.path, HOME_PATH);
    assert_eq!(history.len(), 2);

    assert!(matches!(history.push("/nada"), Err(RouteError::NotFound(_))));
    assert_eq!(history.len(), 2);

    history.push_named(HOME_ROUTE).unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.push_named("nada").is_err());

    assert!(history.back().is_some());
    assert!(history.back().is_some());
    assert!(history.back().is_none());
    assert_eq!(history.len(), 1);
}

#[test]
fn test_hash_history_keeps_unknown_start_location() {
    let table = Arc::new(RouteTable::standard());
    let history = HashHistory::start(table, "/", "http://localhost:5173/#/nada");
    assert_eq!(history.current().path, "/nada");
    assert_eq!(history.current().view, None);
    assert_eq!(history.current().href, "/#/nada");
}
