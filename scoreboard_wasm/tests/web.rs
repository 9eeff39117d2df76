#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use scoreboard_wasm::WebClient;

wasm_bindgen_test_configure!(run_in_browser);


const TEAMS_JSON: &str = r#"[
    {"teamNumber": 1, "teamName": "Sofia", "score": 0},
    {"teamNumber": 2, "teamName": "John", "score": 100}
]"#;

fn document() -> web_sys::Document { web_sys::window().unwrap().document().unwrap() }

fn text_of(id: &str) -> String {
    document().get_element_by_id(id).unwrap().text_content().unwrap_or_default()
}

fn setup_page() {
    document()
        .body()
        .unwrap()
        .set_inner_html(r#"<div id="scoreboard"></div><p id="errorMessage"></p>"#);
}

#[wasm_bindgen_test]
fn renders_one_block_per_team() {
    setup_page();
    let mut client = WebClient::new();
    client.update_teams(TEAMS_JSON).unwrap();
    let scoreboard = document().get_element_by_id("scoreboard").unwrap();
    assert_eq!(scoreboard.child_element_count(), 2);
    assert_eq!(text_of("score2"), "100");
    let icon = document().get_element_by_id("batteryIcon2").unwrap();
    assert_eq!(icon.get_attribute("src").unwrap(), "Images/battery-4.png");
}

#[wasm_bindgen_test]
fn unauthorized_click_shows_access_denied() {
    setup_page();
    let mut client = WebClient::new();
    client.update_teams(TEAMS_JSON).unwrap();
    assert!(client.increase_score(1).unwrap().is_none());
    assert_eq!(text_of("errorMessage"), "Access denied! Only admins can adjust scores.");
    assert_eq!(text_of("score1"), "0");
}

#[wasm_bindgen_test]
fn authorized_click_returns_request() {
    setup_page();
    let mut client = WebClient::new();
    client.update_teams(TEAMS_JSON).unwrap();
    client.set_authorized(true).unwrap();
    assert_eq!(text_of("errorMessage"), "Access granted! You can now adjust scores.");

    let request = client.increase_score(1).unwrap().unwrap();
    assert_eq!(request.path, "/api/scores/1");
    assert_eq!(request.body, r#"{"score":5}"#);
    assert_eq!(text_of("score1"), "5");

    assert!(client.increase_score(2).unwrap().is_none());
    assert!(client.decrease_score(2).unwrap().is_some());
    assert_eq!(text_of("score2"), "95");
}
