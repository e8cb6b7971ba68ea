use super::*;

#[test]
fn selection_wraps_both_ways() {
    let mut app = App::new();
    app.move_up(3);
    assert_eq!(app.selected, 2);
    app.move_down(3);
    assert_eq!(app.selected, 0);
    app.move_down(3);
    assert_eq!(app.selected, 1);
}

#[test]
fn selection_pins_to_zero_on_an_empty_view() {
    let mut app = App::new();
    app.selected = 5;
    app.move_down(0);
    assert_eq!(app.selected, 0);

    app.selected = 5;
    app.move_up(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn selection_clamps_when_the_view_shrinks() {
    let mut app = App::new();
    app.selected = 9;
    app.clamp_selection(4);
    assert_eq!(app.selected, 3);
    app.clamp_selection(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn select_last_handles_empty_views() {
    let mut app = App::new();
    app.select_last(0);
    assert_eq!(app.selected, 0);
    app.select_last(12);
    assert_eq!(app.selected, 11);
}

#[test]
fn download_prompt_opens_with_fresh_inputs() {
    let mut app = App::new();
    app.url_input.push_str("stale");
    app.name_input.push_str("stale");
    app.download_field = DownloadField::Name;

    app.open_download_prompt();
    assert_eq!(app.mode, InputMode::Download);
    assert!(app.url_input.is_empty());
    assert!(app.name_input.is_empty());
    assert_eq!(app.download_field, DownloadField::Url);
}

#[test]
fn folder_prompt_is_seeded_with_the_previous_path() {
    let mut app = App::new();
    app.path_input.push_str("/old");
    app.open_folder_prompt(FolderPurpose::Download, "~/Music");
    assert_eq!(app.mode, InputMode::Folder(FolderPurpose::Download));
    assert_eq!(app.path_input, "~/Music");
}

#[test]
fn settings_rows_wrap_in_both_directions() {
    let mut app = App::new();
    assert_eq!(app.selected_settings_row(), SettingsRow::DownloadFolder);
    app.settings_up();
    assert_eq!(app.selected_settings_row(), SettingsRow::Language);
    app.settings_down();
    app.settings_down();
    assert_eq!(app.selected_settings_row(), SettingsRow::Quality);
}

#[test]
fn closing_an_overlay_returns_to_normal_mode() {
    let mut app = App::new();
    app.open_settings();
    assert_eq!(app.mode, InputMode::Settings);
    app.close_overlay();
    assert_eq!(app.mode, InputMode::Normal);
}

#[test]
fn download_field_focus_toggles() {
    assert_eq!(DownloadField::Url.toggled(), DownloadField::Name);
    assert_eq!(DownloadField::Name.toggled(), DownloadField::Url);
}
