//! Integration tests for the navigation controller
//!
//! These tests drive a [`Navigator`] over in-memory backends:
//! 1. Fragment fetch headers and region updates
//! 2. History entries for pushed and replayed navigations
//! 3. Credential recovery on 401
//! 4. Back/forward replay through `HistorySync`
//! 5. Overlapping navigations

#![cfg(not(target_arch = "wasm32"))]

use fragnav_conf::RouterSettings;
use fragnav_pages::credentials::{CredentialStore, MemoryCredentials};
use fragnav_pages::dom::{LiveDocument, MemoryDocument};
use fragnav_pages::history::{HistoryBackend, HistoryState, HistorySync, MemoryHistory};
use fragnav_pages::navigation::{NavigationKind, NavigationOutcome, Navigator, RouterContext};
use fragnav_pages::notice::MemoryNotifier;
use fragnav_pages::region::RegionName;
use fragnav_pages::script::Executable;
use fragnav_pages::testing::{GatedTransport, StubTransport};
use fragnav_pages::transport::{HttpResponse, Transport};
use http::StatusCode;
use http::header::AUTHORIZATION;
use rstest::*;
use std::rc::Rc;

// ============================================================================
// Fixtures
// ============================================================================

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

struct Page {
	document: Rc<MemoryDocument>,
	history: Rc<MemoryHistory>,
	credentials: Rc<MemoryCredentials>,
	navigator: Rc<Navigator>,
}

fn page_with(
	transport: Rc<dyn Transport>,
	credentials: MemoryCredentials,
	settings: RouterSettings,
) -> Page {
	init_tracing();
	let document = Rc::new(
		MemoryDocument::new()
			.seeded(RegionName::Header, "shell header")
			.seeded(RegionName::Nav, "shell nav")
			.seeded(RegionName::Footer, "shell footer"),
	);
	let history = Rc::new(MemoryHistory::new("/"));
	let credentials = Rc::new(credentials);
	let navigator = Rc::new(Navigator::new(RouterContext::new(
		document.clone(),
		transport,
		history.clone(),
		credentials.clone(),
		Rc::new(MemoryNotifier::new()),
		settings,
	)));
	Page {
		document,
		history,
		credentials,
		navigator,
	}
}

fn page(transport: Rc<dyn Transport>, credentials: MemoryCredentials) -> Page {
	page_with(transport, credentials, RouterSettings::default())
}

#[fixture]
fn site() -> Rc<StubTransport> {
	Rc::new(
		StubTransport::new()
			.respond("/home", StatusCode::OK, "<main>Welcome</main>")
			.respond(
				"/profile/",
				StatusCode::OK,
				r#"<nav><a data-link href="/home">home</a></nav><main><h1>Profile</h1><script src="/static/js/profile.js"></script></main>"#,
			)
			.respond(
				"/friends/",
				StatusCode::OK,
				"<main><ul id=\"friends\"></ul></main><script>loadFriends();</script>",
			)
			.respond("/login", StatusCode::OK, "<main>login form</main>"),
	)
}

// ============================================================================
// Scenarios
// ============================================================================

/// Anonymous navigation sends no Authorization header and pushes one entry
#[rstest]
#[tokio::test]
async fn test_anonymous_home(site: Rc<StubTransport>) {
	let page = page(site.clone(), MemoryCredentials::new());

	let outcome = page.navigator.navigate("/home", NavigationKind::Push).await;

	assert_eq!(outcome.completed_url(), Some("/home"));
	let requests = site.requests();
	assert_eq!(requests.len(), 1);
	assert!(requests[0].headers.get(AUTHORIZATION).is_none());
	assert_eq!(requests[0].headers["x-requested-with"], "XMLHttpRequest");
	assert_eq!(page.document.region_html(RegionName::Main).as_deref(), Some("Welcome"));
	assert_eq!(page.history.pushed(), vec![HistoryState::new("/home")]);
}

/// A stored credential is sent as a bearer token
#[rstest]
#[tokio::test]
async fn test_profile_with_credential(site: Rc<StubTransport>) {
	let page = page(site.clone(), MemoryCredentials::with_token("abc123"));

	page.navigator.navigate("/profile/", NavigationKind::Push).await;

	assert_eq!(site.requests()[0].headers[AUTHORIZATION], "Bearer abc123");
	assert_eq!(
		page.document.region_html(RegionName::Nav).as_deref(),
		Some(r#"<a data-link="" href="/home">home</a>"#)
	);
	assert_eq!(
		page.document.region_html(RegionName::Main).as_deref(),
		Some("<h1>Profile</h1>")
	);
	assert_eq!(
		page.document.executed_scripts(),
		vec![Executable::Remote("/static/js/profile.js".to_string())]
	);
}

/// Regions absent from the fragment keep their content
#[rstest]
#[tokio::test]
async fn test_untouched_regions_survive(site: Rc<StubTransport>) {
	let page = page(site, MemoryCredentials::new());

	page.navigator.navigate("/friends/", NavigationKind::Push).await;

	assert_eq!(page.document.region_html(RegionName::Header).as_deref(), Some("shell header"));
	assert_eq!(page.document.region_html(RegionName::Nav).as_deref(), Some("shell nav"));
	assert_eq!(page.document.region_html(RegionName::Footer).as_deref(), Some("shell footer"));
	assert_eq!(
		page.document.executed_scripts(),
		vec![Executable::Inline("loadFriends();".to_string())]
	);
}

/// A 401 during a replayed navigation still pushes the login entry
#[rstest]
#[tokio::test]
async fn test_unauthorized_replay_pushes_login() {
	let transport = Rc::new(
		StubTransport::new()
			.respond("/profile/", StatusCode::UNAUTHORIZED, "")
			.respond("/login", StatusCode::OK, "<main>login form</main>"),
	);
	let page = page(transport.clone(), MemoryCredentials::with_token("expired"));

	let outcome = page.navigator.navigate("/profile/", NavigationKind::Replay).await;

	assert_eq!(outcome.completed_url(), Some("/login"));
	assert_eq!(page.credentials.get(), None);
	assert_eq!(page.history.pushed(), vec![HistoryState::new("/login")]);
	let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
	assert_eq!(urls, vec!["/profile/", "/login"]);
}

/// The login path comes from the settings
#[rstest]
#[tokio::test]
async fn test_unauthorized_uses_configured_login_path() {
	let settings = RouterSettings::from_toml_str(r#"login_path = "/accounts/login/""#).unwrap();
	let transport = Rc::new(
		StubTransport::new()
			.respond("/home", StatusCode::UNAUTHORIZED, "")
			.respond("/accounts/login/", StatusCode::OK, "<main>sign in</main>"),
	);
	let page = page_with(transport, MemoryCredentials::with_token("t"), settings);

	let outcome = page.navigator.navigate("/home", NavigationKind::Push).await;

	assert_eq!(outcome.completed_url(), Some("/accounts/login/"));
	assert_eq!(page.document.region_html(RegionName::Main).as_deref(), Some("sign in"));
}

// ============================================================================
// History replay
// ============================================================================

/// Going back replays the restored location without pushing
#[rstest]
#[tokio::test]
async fn test_back_replays_previous_page(site: Rc<StubTransport>) {
	let page = page(site.clone(), MemoryCredentials::new());
	let sync = HistorySync::new(page.navigator.clone());

	page.navigator.navigate("/home", NavigationKind::Push).await;
	page.navigator.navigate("/friends/", NavigationKind::Push).await;
	assert_eq!(page.history.len(), 3);

	let state = page.history.back().unwrap();
	let outcome = sync.on_popstate(state).await.unwrap();

	assert!(matches!(
		outcome,
		NavigationOutcome::Completed {
			history_pushed: false,
			..
		}
	));
	assert_eq!(outcome.completed_url(), Some("/home"));
	assert_eq!(page.document.region_html(RegionName::Main).as_deref(), Some("Welcome"));
	assert_eq!(page.history.len(), 3);
	assert_eq!(page.history.current_location(), "/home");
	assert_eq!(site.requests().len(), 3);
}

/// Reaching the initial entry (no state) does not fetch anything
#[rstest]
#[tokio::test]
async fn test_back_to_initial_entry_is_ignored(site: Rc<StubTransport>) {
	let page = page(site.clone(), MemoryCredentials::new());
	let sync = HistorySync::new(page.navigator.clone());
	page.navigator.navigate("/home", NavigationKind::Push).await;

	let state = page.history.back().unwrap();

	assert_eq!(state, None);
	assert_eq!(sync.on_popstate(state).await, None);
	assert_eq!(site.requests().len(), 1);
}

/// Forward after back replays the later page
#[rstest]
#[tokio::test]
async fn test_forward_replays_next_page(site: Rc<StubTransport>) {
	let page = page(site, MemoryCredentials::new());
	let sync = HistorySync::new(page.navigator.clone());
	page.navigator.navigate("/home", NavigationKind::Push).await;
	page.navigator.navigate("/friends/", NavigationKind::Push).await;

	let back = page.history.back().unwrap();
	sync.on_popstate(back).await;
	let forward = page.history.forward().unwrap();
	let outcome = sync.on_popstate(forward).await.unwrap();

	assert_eq!(outcome.completed_url(), Some("/friends/"));
	assert_eq!(
		page.history.pushed(),
		vec![HistoryState::new("/home"), HistoryState::new("/friends/")]
	);
}

// ============================================================================
// Overlapping navigations
// ============================================================================

/// The last navigation started wins, whatever order responses arrive in
#[rstest]
#[tokio::test]
async fn test_stale_response_is_discarded() {
	let transport = Rc::new(GatedTransport::new());
	let page = page(transport.clone(), MemoryCredentials::new());

	let slow = page.navigator.navigate("/slow", NavigationKind::Push);
	let fast = page.navigator.navigate("/fast", NavigationKind::Push);
	let respond = async {
		assert_eq!(transport.pending_urls(), vec!["/slow", "/fast"]);
		assert!(transport.release("/fast", HttpResponse::ok("<main>fast</main>")));
		assert!(transport.release("/slow", HttpResponse::ok("<main>slow</main>")));
	};

	let (slow, fast, ()) = futures::join!(slow, fast, respond);

	assert_eq!(
		slow,
		NavigationOutcome::Superseded {
			url: "/slow".to_string()
		}
	);
	assert_eq!(fast.completed_url(), Some("/fast"));
	assert_eq!(page.document.region_html(RegionName::Main).as_deref(), Some("fast"));
	assert_eq!(page.history.pushed(), vec![HistoryState::new("/fast")]);
}

/// A superseded 401 neither clears the credential nor redirects
#[rstest]
#[tokio::test]
async fn test_stale_unauthorized_is_ignored() {
	let transport = Rc::new(GatedTransport::new());
	let page = page(transport.clone(), MemoryCredentials::with_token("t"));

	let stale = page.navigator.navigate("/old", NavigationKind::Push);
	let current = page.navigator.navigate("/new", NavigationKind::Push);
	let respond = async {
		assert!(transport.release("/old", HttpResponse::new(StatusCode::UNAUTHORIZED, "")));
		assert!(transport.release("/new", HttpResponse::ok("<main>new</main>")));
	};

	let (stale, current, ()) = futures::join!(stale, current, respond);

	assert!(matches!(stale, NavigationOutcome::Superseded { .. }));
	assert!(current.is_completed());
	assert_eq!(page.credentials.get().as_deref(), Some("t"));
	assert!(transport.pending_urls().is_empty());
}

/// Seeded content is replaced, not appended to
#[rstest]
#[tokio::test]
async fn test_main_is_overwritten(site: Rc<StubTransport>) {
	let page = page(site, MemoryCredentials::new());
	page.document
		.replace_region(RegionName::Main, "<p>stale</p>")
		.unwrap();

	page.navigator.navigate("/home", NavigationKind::Push).await;

	assert_eq!(page.document.region_html(RegionName::Main).as_deref(), Some("Welcome"));
}
