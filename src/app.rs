use std::path::{Path, PathBuf};

use iced::widget::{button, checkbox, column, container, image, row, rule, scrollable, text, Space};
use iced::{Color, Element, Length, Size, Subscription, Task, Theme};

use crate::actions::Action;
use crate::config::Config;
use crate::destination::{self, DestinationSelection};
use crate::error::Error;
use crate::key_listener::KeyListener;
use crate::navigation::{Direction, NavigationState};
use crate::scanner::{self, ImageEntry};
use crate::viewer::Viewer;

const LIST_WIDTH: f32 = 240.0;
const DEST_WIDTH: f32 = 260.0;
const PADDING: f32 = 10.0;
// Toolbar, control row and status line.
const CHROME_HEIGHT: f32 = 52.0 + 52.0 + 28.0;

const LABEL_COLOR: Color = Color::from_rgb(0.5, 0.5, 0.55);

fn boot() -> (Sorter, Task<Message>) {
    let config = Config::from_env();
    let mut state = Sorter::new(config);
    let (w, h) = state.config.window_size;
    resize_surface(&mut state, Size::new(w, h));
    (state, Task::none())
}

pub fn run() -> iced::Result {
    let (w, h) = Config::default().window_size;
    iced::application(boot, update, view)
        .title("picksort")
        .theme(theme)
        .subscription(subscription)
        .window_size(Size::new(w, h))
        .centered()
        .run()
}

struct Sorter {
    config: Config,
    folder: Option<PathBuf>,
    navigation: NavigationState,
    viewer: Viewer,
    destination: DestinationSelection,
    /// Contents of the folder that last received a copy.
    saved: Vec<ImageEntry>,
    saved_folder: Option<PathBuf>,
    status: Option<String>,
}

impl Sorter {
    fn new(config: Config) -> Self {
        let viewer = Viewer::new(config.zoom);
        Self {
            config,
            folder: None,
            navigation: NavigationState::default(),
            viewer,
            destination: DestinationSelection::default(),
            saved: Vec::new(),
            saved_folder: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    OpenFolder,
    FolderSelected(Option<PathBuf>),
    ChooseDestination,
    DestinationSelected(Option<PathBuf>),
    Perform(Action),
    /// A shortcut held down long enough to auto-repeat.
    Repeated(Action),
    SelectImage(usize),
    SaveTo(usize),
    PanToggled(bool),
    Dragged(f32, f32),
    Scrolled(f32),
    WindowResized(Size),
    WarningClosed,
}

fn subscription(_state: &Sorter) -> Subscription<Message> {
    iced::event::listen_with(|event, _status, _window| match event {
        iced::Event::Window(iced::window::Event::Resized(size)) => {
            Some(Message::WindowResized(size))
        }
        _ => None,
    })
}

fn update(state: &mut Sorter, message: Message) -> Task<Message> {
    match message {
        Message::OpenFolder => {
            return Task::perform(pick_folder("Select Directory"), Message::FolderSelected);
        }
        Message::FolderSelected(None) => {
            return warn(state, Error::NoFolderSelected);
        }
        Message::FolderSelected(Some(path)) => {
            return open_folder(state, path);
        }
        Message::ChooseDestination => {
            return Task::perform(
                pick_folder("Select Destination Directory"),
                Message::DestinationSelected,
            );
        }
        Message::DestinationSelected(None) => {
            state.destination.clear();
            return warn(state, Error::NoFolderSelected);
        }
        Message::DestinationSelected(Some(path)) => {
            if let Err(source) = state.destination.choose_root(path.clone()) {
                return warn(state, Error::Destination { path, source });
            }
            state.status = None;
        }
        Message::Perform(action) => {
            return perform(state, action);
        }
        Message::Repeated(action) => {
            return perform_repeated(state, action);
        }
        Message::SelectImage(index) => {
            if let Some(path) = state.navigation.select(index).map(|e| e.path.clone()) {
                return show(state, &path);
            }
        }
        Message::SaveTo(index) => {
            let target = state.destination.target(index).map(|t| t.path.clone());
            return save_into(state, target);
        }
        Message::PanToggled(enabled) => {
            state.viewer.set_pan_enabled(enabled);
        }
        Message::Dragged(dx, dy) => {
            state.viewer.drag(dx, dy);
        }
        Message::Scrolled(delta) => {
            if state.viewer.has_image() {
                if delta > 0.0 {
                    state.viewer.zoom_in();
                } else if delta < 0.0 {
                    state.viewer.zoom_out();
                }
            }
        }
        Message::WindowResized(size) => {
            resize_surface(state, size);
        }
        Message::WarningClosed => {}
    }
    Task::none()
}

fn perform(state: &mut Sorter, action: Action) -> Task<Message> {
    log::debug!("Action {}", action.name());
    match action {
        Action::Quit => return iced::exit(),
        Action::Previous => return step(state, Direction::Previous, false),
        Action::Next => return step(state, Direction::Next, false),
        Action::ZoomIn => state.viewer.zoom_in(),
        Action::ZoomOut => state.viewer.zoom_out(),
        Action::ResetZoom => state.viewer.reset_zoom(),
        Action::SaveToRoot => {
            let root = state.destination.root().map(Path::to_path_buf);
            return save_into(state, root);
        }
    }
    Task::none()
}

/// Held keys keep stepping and zooming, but stop quietly at either end of
/// the folder and never copy or quit more than once.
fn perform_repeated(state: &mut Sorter, action: Action) -> Task<Message> {
    match action {
        Action::Previous => step(state, Direction::Previous, true),
        Action::Next => step(state, Direction::Next, true),
        Action::Quit | Action::SaveToRoot => Task::none(),
        Action::ZoomIn | Action::ZoomOut | Action::ResetZoom => perform(state, action),
    }
}

fn open_folder(state: &mut Sorter, path: PathBuf) -> Task<Message> {
    let entries = scanner::scan(&path);
    state.folder = Some(path);
    state.navigation.replace(entries);
    state.status = None;

    let Some(first) = state.navigation.current().map(|e| e.path.clone()) else {
        state.viewer.clear();
        return warn(state, Error::EmptyFolder);
    };
    state.viewer.set_pan_enabled(true);
    show(state, &first)
}

fn step(state: &mut Sorter, direction: Direction, repeat: bool) -> Task<Message> {
    match state.navigation.advance(direction) {
        Ok(entry) => {
            let path = entry.path.clone();
            show(state, &path)
        }
        Err(e) if repeat && e.is_boundary() => {
            log::debug!("{} (key repeat)", e);
            Task::none()
        }
        Err(e) => warn(state, e),
    }
}

fn show(state: &mut Sorter, path: &Path) -> Task<Message> {
    match state.viewer.load_image(path) {
        Ok(()) => Task::none(),
        Err(e) => warn(state, e),
    }
}

fn save_into(state: &mut Sorter, destination: Option<PathBuf>) -> Task<Message> {
    let copied = destination::copy_current(
        state.navigation.current(),
        destination.as_deref(),
        state.config.overwrite,
    );
    match copied {
        Ok(target) => {
            if let Some(folder) = target.parent() {
                state.saved = scanner::scan(folder);
                state.saved_folder = Some(folder.to_path_buf());
            }
            state.status = Some(format!("Saved {}", target.display()));
            Task::none()
        }
        Err(e) => warn(state, e),
    }
}

/// Report a recoverable problem: status line plus a native warning dialog.
fn warn(state: &mut Sorter, error: Error) -> Task<Message> {
    if error.is_boundary() {
        log::debug!("{}", error);
    } else {
        log::warn!("{}", error);
    }
    let title = error.title();
    let description = error.to_string();
    state.status = Some(description.clone());
    Task::perform(show_warning(title, description), |()| Message::WarningClosed)
}

fn resize_surface(state: &mut Sorter, window: Size) {
    let width = window.width - LIST_WIDTH - DEST_WIDTH - PADDING * 4.0;
    let height = window.height - CHROME_HEIGHT - PADDING * 2.0;
    state.viewer.on_resize(width.max(0.0), height.max(0.0));
}

fn view(state: &Sorter) -> Element<'_, Message> {
    let toolbar = row![
        button("Open Folder").on_press(Message::OpenFolder),
        button("Save Folder").on_press(Message::ChooseDestination),
        Space::new().width(Length::Fill),
        text(match &state.folder {
            Some(p) => p.display().to_string(),
            None => "No folder selected".into(),
        })
        .size(14),
    ]
    .spacing(10)
    .padding(PADDING);

    let body = row![
        image_list(state),
        column![image_surface(state), controls(state)].spacing(8),
        destination_panel(state),
    ]
    .spacing(PADDING)
    .padding([0.0, PADDING])
    .height(Length::Fill);

    let status = text(state.status.clone().unwrap_or_default())
        .size(12)
        .color(LABEL_COLOR);

    let content = column![toolbar, body, container(status).padding([4.0, PADDING])];

    KeyListener::new(content, |key, repeat| {
        let action = state.config.key_bindings.resolve(key)?;
        Some(if repeat {
            Message::Repeated(action)
        } else {
            Message::Perform(action)
        })
    })
    .into()
}

fn image_list(state: &Sorter) -> Element<'_, Message> {
    let current = state.navigation.current_index();
    let items: Vec<Element<'_, Message>> = state
        .navigation
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let style = if current == Some(index) {
                button::primary
            } else {
                button::text
            };
            button(text(&entry.name).size(13))
                .on_press(Message::SelectImage(index))
                .style(style)
                .width(Length::Fill)
                .into()
        })
        .collect();

    column![
        text(format!("Num: {}", state.navigation.controls().count))
            .size(13)
            .color(LABEL_COLOR),
        scrollable(column(items).spacing(2)).height(Length::Fill),
    ]
    .spacing(6)
    .width(LIST_WIDTH)
    .into()
}

fn image_surface(state: &Sorter) -> Element<'_, Message> {
    let inner: Element<'_, Message> = match state.viewer.frame() {
        Some(frame) => image(frame.handle.clone())
            .width(frame.width as f32)
            .height(frame.height as f32)
            .into(),
        None if state.folder.is_some() && state.navigation.is_empty() => {
            text("No images in this folder").color(LABEL_COLOR).into()
        }
        None if state.folder.is_some() => text("No image to show").color(LABEL_COLOR).into(),
        None => text("Open a folder to browse images").color(LABEL_COLOR).into(),
    };

    let surface = container(inner)
        .center(Length::Fill)
        .style(container::dark);

    KeyListener::new(surface, |_, _| None)
        .on_drag(|dx, dy| Some(Message::Dragged(dx, dy)))
        .on_scroll(|delta| Some(Message::Scrolled(delta)))
        .into()
}

fn controls(state: &Sorter) -> Element<'_, Message> {
    let nav = state.navigation.controls();
    let has_image = state.viewer.has_image();

    row![
        action_button(state, "Previous", Action::Previous, nav.prev_enabled),
        action_button(state, "Next", Action::Next, nav.next_enabled),
        Space::new().width(20.0),
        action_button(state, "Zoom +", Action::ZoomIn, has_image),
        action_button(state, "Zoom -", Action::ZoomOut, has_image),
        action_button(state, "Reset", Action::ResetZoom, has_image),
        checkbox(state.viewer.pan_enabled())
            .label("Pan")
            .on_toggle(Message::PanToggled),
        Space::new().width(Length::Fill),
        text(position_label(state)).size(13),
        text(format!("{:.0}%", state.viewer.zoom_factor() * 100.0))
            .size(13)
            .color(LABEL_COLOR),
        action_button(
            state,
            "Save",
            Action::SaveToRoot,
            has_image && state.destination.root().is_some(),
        ),
    ]
    .spacing(8)
    .align_y(iced::alignment::Vertical::Center)
    .into()
}

fn position_label(state: &Sorter) -> String {
    let (Some(path), Some(index)) = (state.viewer.path(), state.navigation.current_index()) else {
        return String::new();
    };
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{} ({}/{})", filename, index + 1, state.navigation.entries().len())
}

fn action_button<'a>(
    state: &Sorter,
    label: &str,
    action: Action,
    enabled: bool,
) -> Element<'a, Message> {
    let label = match state.config.key_bindings.label_for(action) {
        Some(key) => format!("{label} ({key})"),
        None => label.to_string(),
    };
    button(text(label).size(13))
        .on_press_maybe(enabled.then_some(Message::Perform(action)))
        .into()
}

fn destination_panel(state: &Sorter) -> Element<'_, Message> {
    let mut items: Vec<Element<'_, Message>> = vec![
        text("Save to").size(11).color(LABEL_COLOR).into(),
        text(match state.destination.root() {
            Some(root) => root.display().to_string(),
            None => "No destination selected".into(),
        })
        .size(13)
        .into(),
    ];

    let can_save = state.navigation.current().is_some();
    for (index, target) in state.destination.targets().iter().enumerate() {
        items.push(
            row![
                text(&target.label).size(13).width(Length::Fill),
                button(text("Save").size(12))
                    .on_press_maybe(can_save.then_some(Message::SaveTo(index))),
            ]
            .spacing(8)
            .align_y(iced::alignment::Vertical::Center)
            .into(),
        );
    }

    items.push(container(rule::horizontal(1)).padding([4, 0]).into());
    items.push(
        text(match &state.saved_folder {
            Some(folder) => format!("Num: {} in {}", state.saved.len(), folder.display()),
            None => "Num: 0".into(),
        })
        .size(12)
        .color(LABEL_COLOR)
        .into(),
    );

    let saved: Vec<Element<'_, Message>> = state
        .saved
        .iter()
        .map(|entry| text(&entry.name).size(12).into())
        .collect();
    items.push(scrollable(column(saved).spacing(2)).height(Length::Fill).into());

    column(items).spacing(6).width(DEST_WIDTH).into()
}

fn theme(_state: &Sorter) -> Theme {
    Theme::Dark
}

async fn pick_folder(title: &'static str) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new().set_title(title);
    if let Some(home) = dirs_next::home_dir() {
        dialog = dialog.set_directory(home);
    }
    dialog
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

async fn show_warning(title: &'static str, description: String) {
    rfd::AsyncMessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok)
        .show()
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        ::image::RgbaImage::from_pixel(8, 6, ::image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .expect("failed to write test png");
        path
    }

    fn sorter_with_folder(names: &[&str]) -> (Sorter, TempDir) {
        let dir = tempdir().expect("failed to create temp dir");
        for name in names {
            write_png(dir.path(), name);
        }
        let mut state = Sorter::new(Config::default());
        resize_surface(&mut state, Size::new(1280.0, 800.0));
        let _ = open_folder(&mut state, dir.path().to_path_buf());
        (state, dir)
    }

    #[test]
    fn opening_a_folder_shows_first_image_with_pan_enabled() {
        let (state, _dir) = sorter_with_folder(&["a.png", "b.png"]);
        let first = state.navigation.entries()[0].path.clone();
        assert_eq!(state.viewer.path(), Some(first.as_path()));
        assert!(state.viewer.pan_enabled());
        assert!(state.viewer.frame().is_some());
        assert!(state.status.is_none());
    }

    #[test]
    fn empty_folder_is_reported() {
        let (state, _dir) = sorter_with_folder(&[]);
        assert!(state.navigation.is_empty());
        assert!(!state.viewer.has_image());
        assert_eq!(state.status.as_deref(), Some("The selected folder contains no images"));
    }

    #[test]
    fn stepping_past_the_end_keeps_position() {
        let (mut state, _dir) = sorter_with_folder(&["a.png", "b.png"]);
        let _ = perform(&mut state, Action::Next);
        assert_eq!(state.navigation.current_index(), Some(1));
        let _ = perform(&mut state, Action::Next);
        assert_eq!(state.navigation.current_index(), Some(1));
        assert_eq!(state.status.as_deref(), Some("No more images"));
    }

    #[test]
    fn held_key_at_the_end_stops_without_a_warning() {
        let (mut state, _dir) = sorter_with_folder(&["a.png", "b.png"]);
        let _ = update(&mut state, Message::Repeated(Action::Next));
        assert_eq!(state.navigation.current_index(), Some(1));

        for _ in 0..5 {
            let _ = update(&mut state, Message::Repeated(Action::Next));
        }
        assert_eq!(state.navigation.current_index(), Some(1));
        assert!(state.status.is_none());

        let _ = update(&mut state, Message::Perform(Action::Next));
        assert_eq!(state.status.as_deref(), Some("No more images"));
    }

    #[test]
    fn held_save_key_copies_once() {
        let (mut state, _dir) = sorter_with_folder(&["a.png"]);
        let out = tempdir().expect("failed to create temp dir");
        let _ = update(
            &mut state,
            Message::DestinationSelected(Some(out.path().to_path_buf())),
        );

        let _ = update(&mut state, Message::Repeated(Action::SaveToRoot));
        assert!(!out.path().join("a.png").exists());
        let _ = update(&mut state, Message::Perform(Action::SaveToRoot));
        assert!(out.path().join("a.png").exists());
    }

    #[test]
    fn scroll_direction_picks_zoom() {
        let (mut state, _dir) = sorter_with_folder(&["a.png"]);
        let _ = update(&mut state, Message::Scrolled(1.0));
        assert!(state.viewer.zoom_factor() > 1.0);
        let _ = update(&mut state, Message::Scrolled(0.0));
        let _ = update(&mut state, Message::Scrolled(-1.0));
        assert_eq!(state.viewer.zoom_factor(), 1.0);
    }

    #[test]
    fn zoom_actions_drive_the_viewer() {
        let (mut state, _dir) = sorter_with_folder(&["a.png"]);
        let _ = perform(&mut state, Action::ZoomIn);
        assert!(state.viewer.zoom_factor() > 1.0);
        let _ = perform(&mut state, Action::ResetZoom);
        assert_eq!(state.viewer.zoom_factor(), 1.0);
    }

    #[test]
    fn save_without_destination_warns() {
        let (mut state, dir) = sorter_with_folder(&["a.png"]);
        let _ = perform(&mut state, Action::SaveToRoot);
        assert_eq!(
            state.status.as_deref(),
            Some("You have not chosen a folder to save to")
        );
        assert_eq!(fs::read_dir(dir.path()).expect("read_dir failed").count(), 1);
    }

    #[test]
    fn saving_to_a_subfolder_refreshes_saved_list() {
        let (mut state, _dir) = sorter_with_folder(&["a.png"]);
        let out = tempdir().expect("failed to create temp dir");
        fs::create_dir(out.path().join("keep")).expect("mkdir failed");
        fs::create_dir(out.path().join("reject")).expect("mkdir failed");

        let _ = update(
            &mut state,
            Message::DestinationSelected(Some(out.path().to_path_buf())),
        );
        let _ = update(&mut state, Message::SaveTo(0));

        assert!(out.path().join("keep").join("a.png").exists());
        assert_eq!(state.saved_folder.as_deref(), Some(out.path().join("keep").as_path()));
        assert_eq!(state.saved.len(), 1);
    }

    #[test]
    fn cancelled_destination_clears_selection() {
        let (mut state, _dir) = sorter_with_folder(&["a.png"]);
        let out = tempdir().expect("failed to create temp dir");
        let _ = update(
            &mut state,
            Message::DestinationSelected(Some(out.path().to_path_buf())),
        );
        let _ = update(&mut state, Message::DestinationSelected(None));
        assert!(state.destination.root().is_none());
    }

    #[test]
    fn missing_destination_folder_is_reported_as_such() {
        let (mut state, _dir) = sorter_with_folder(&["a.png"]);
        let out = tempdir().expect("failed to create temp dir");
        let missing = out.path().join("missing");

        let _ = update(&mut state, Message::DestinationSelected(Some(missing.clone())));
        assert!(state.destination.root().is_none());
        let status = state.status.clone().expect("a warning should be shown");
        assert!(status.starts_with("Cannot save to"));
        assert!(status.contains(&missing.display().to_string()));
    }

    #[test]
    fn saving_into_the_source_folder_leaves_the_image_intact() {
        let (mut state, dir) = sorter_with_folder(&["a.png"]);
        let before = fs::read(dir.path().join("a.png")).expect("read failed");

        let _ = update(
            &mut state,
            Message::DestinationSelected(Some(dir.path().to_path_buf())),
        );
        let _ = update(&mut state, Message::Perform(Action::SaveToRoot));

        assert_eq!(fs::read(dir.path().join("a.png")).expect("read failed"), before);
        assert!(state.status.as_deref().is_some_and(|s| s.contains("already in that folder")));
    }

    #[test]
    fn broken_image_moves_selection_but_shows_nothing() {
        let (mut state, dir) = sorter_with_folder(&[]);
        write_png(dir.path(), "good.png");
        fs::write(dir.path().join("bad.png"), b"garbage").expect("write failed");
        let _ = open_folder(&mut state, dir.path().to_path_buf());

        let bad = state
            .navigation
            .entries()
            .iter()
            .position(|e| e.name == "bad.png")
            .expect("bad.png should be listed");
        let _ = update(&mut state, Message::SelectImage(bad));
        assert_eq!(state.navigation.current_index(), Some(bad));
        assert!(!state.viewer.has_image());
        assert!(state.status.as_deref().is_some_and(|s| s.contains("bad.png")));
    }
}
