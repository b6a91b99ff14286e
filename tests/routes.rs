use actix_web_flash_messages::Level;
use lead_tracker::routes::{alert_level_to_str, linkify};

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[test]
fn test_linkify_opens_links_in_new_tab() {
    let html = linkify("Menu at www.citybrew.com & https://citybrew.com/menu");
    assert_eq!(html.matches("<a ").count(), 2);
    assert_eq!(html.matches("target=\"_blank\"").count(), 2);
    assert!(html.contains("&amp;"));
}
