use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::model::ModelSize;

/// Handles returned from building the main window.
pub struct WindowWidgets {
    pub window: libadwaita::ApplicationWindow,
    pub file_row: libadwaita::ActionRow,
    pub browse_button: gtk4::Button,
    pub model_row: libadwaita::ComboRow,
    pub start_button: gtk4::Button,
    pub progress_bar: gtk4::ProgressBar,
    pub status_label: gtk4::Label,
    pub transcript_view: gtk4::TextView,
}

/// Build the main window.
pub fn build_window(
    app: &libadwaita::Application,
    initial_model: ModelSize,
) -> WindowWidgets {
    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .title("Whisper Desk")
        .default_width(640)
        .default_height(560)
        .build();

    let toolbar_view = libadwaita::ToolbarView::new();
    let header = libadwaita::HeaderBar::new();

    // Add menu button
    let menu_button = gtk4::MenuButton::new();
    menu_button.set_icon_name("open-menu-symbolic");

    let menu = gtk4::gio::Menu::new();
    menu.append(Some("About Whisper Desk"), Some("app.about"));
    menu.append(Some("Quit"), Some("app.quit"));

    menu_button.set_menu_model(Some(&menu));
    header.pack_end(&menu_button);

    toolbar_view.add_top_bar(&header);

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);

    // --- Input group ---
    let input_group = libadwaita::PreferencesGroup::new();
    input_group.set_title("Input");

    let file_row = libadwaita::ActionRow::builder()
        .title("Audio / Video File")
        .subtitle("No file selected")
        .build();
    let browse_button = gtk4::Button::builder()
        .label("Browse")
        .valign(gtk4::Align::Center)
        .build();
    file_row.add_suffix(&browse_button);
    input_group.add(&file_row);

    let model_names: Vec<&str> = ModelSize::ALL.iter().map(|m| m.as_str()).collect();
    let model_row = libadwaita::ComboRow::builder()
        .title("Model Size")
        .model(&gtk4::StringList::new(&model_names))
        .build();
    let initial_index = ModelSize::ALL
        .iter()
        .position(|m| *m == initial_model)
        .unwrap_or(0);
    model_row.set_selected(initial_index as u32);
    input_group.add(&model_row);

    content.append(&input_group);
    content.append(&gtk4::Separator::new(gtk4::Orientation::Horizontal));

    // --- Controls ---
    let start_button = gtk4::Button::builder()
        .label("Start Transcription")
        .margin_top(12)
        .build();
    start_button.add_css_class("suggested-action");
    content.append(&start_button);

    let progress_bar = gtk4::ProgressBar::new();
    progress_bar.set_margin_top(12);
    progress_bar.set_visible(false);
    progress_bar.set_show_text(true);
    content.append(&progress_bar);

    let status_label = gtk4::Label::new(Some("Ready to transcribe."));
    status_label.set_wrap(true);
    status_label.set_xalign(0.0);
    status_label.set_margin_top(8);
    status_label.add_css_class("dim-label");
    content.append(&status_label);

    // --- Transcript ---
    let transcript_group = libadwaita::PreferencesGroup::new();
    transcript_group.set_title("Transcript");
    transcript_group.set_margin_top(12);

    let transcript_view = gtk4::TextView::builder()
        .editable(false)
        .wrap_mode(gtk4::WrapMode::WordChar)
        .top_margin(8)
        .bottom_margin(8)
        .left_margin(8)
        .right_margin(8)
        .build();

    let transcript_scroll = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .min_content_height(200)
        .vexpand(true)
        .child(&transcript_view)
        .build();
    transcript_scroll.add_css_class("card");
    transcript_group.add(&transcript_scroll);

    content.append(&transcript_group);

    // Assemble
    toolbar_view.set_content(Some(&content));
    window.set_content(Some(&toolbar_view));

    WindowWidgets {
        window,
        file_row,
        browse_button,
        model_row,
        start_button,
        progress_bar,
        status_label,
        transcript_view,
    }
}

/// File dialog preset for the media formats whisper + ffmpeg handle.
pub fn media_file_dialog() -> gtk4::FileDialog {
    let media_filter = gtk4::FileFilter::new();
    media_filter.set_name(Some("Audio and Video Files"));
    for pattern in ["*.mp3", "*.wav", "*.m4a", "*.mp4", "*.flac", "*.ogg", "*.webm"] {
        media_filter.add_pattern(pattern);
    }

    let all_filter = gtk4::FileFilter::new();
    all_filter.set_name(Some("All Files"));
    all_filter.add_pattern("*");

    let filters = gtk4::gio::ListStore::new::<gtk4::FileFilter>();
    filters.append(&media_filter);
    filters.append(&all_filter);

    gtk4::FileDialog::builder()
        .title("Select Audio File")
        .filters(&filters)
        .default_filter(&media_filter)
        .build()
}
