//! A transparent wrapper widget that turns raw input into messages in the
//! same frame as the event.
//!
//! Keys go to `on_key_press`. A left-button drag past a small threshold is
//! reported as deltas through `on_drag`, and the wheel through `on_scroll`.
//! Clicks that a child widget (list item, button) captures are left alone.

use iced::advanced::layout;
use iced::advanced::overlay;
use iced::advanced::renderer;
use iced::advanced::widget::tree::Tag;
use iced::advanced::widget::{Operation, Tree};
use iced::advanced::{Clipboard, Layout, Shell, Widget};
use iced::{keyboard, mouse, Element, Event, Length, Point, Rectangle, Size, Vector};

const DRAG_THRESHOLD: f32 = 4.0;

#[derive(Debug, Default)]
struct State {
    pressed: bool,
    press_pos: Option<Point>,
    dragging: bool,
    last_pos: Option<Point>,
}

impl State {
    fn release(&mut self) {
        *self = State::default();
    }
}

pub struct KeyListener<'a, Message, Theme = iced::Theme, Renderer = iced::Renderer> {
    content: Element<'a, Message, Theme, Renderer>,
    /// Called with the key and whether it is an auto-repeat.
    on_key_press: Box<dyn Fn(&keyboard::Key, bool) -> Option<Message> + 'a>,
    /// Called with (dx, dy) while the left button is dragged.
    on_drag: Option<Box<dyn Fn(f32, f32) -> Option<Message> + 'a>>,
    /// Called with the vertical wheel delta in lines.
    on_scroll: Option<Box<dyn Fn(f32) -> Option<Message> + 'a>>,
}

impl<'a, Message, Theme, Renderer> KeyListener<'a, Message, Theme, Renderer> {
    pub fn new(
        content: impl Into<Element<'a, Message, Theme, Renderer>>,
        on_key_press: impl Fn(&keyboard::Key, bool) -> Option<Message> + 'a,
    ) -> Self {
        Self {
            content: content.into(),
            on_key_press: Box::new(on_key_press),
            on_drag: None,
            on_scroll: None,
        }
    }

    pub fn on_drag(mut self, f: impl Fn(f32, f32) -> Option<Message> + 'a) -> Self {
        self.on_drag = Some(Box::new(f));
        self
    }

    pub fn on_scroll(mut self, f: impl Fn(f32) -> Option<Message> + 'a) -> Self {
        self.on_scroll = Some(Box::new(f));
        self
    }
}

impl<Message, Theme, Renderer> Widget<Message, Theme, Renderer>
    for KeyListener<'_, Message, Theme, Renderer>
where
    Renderer: iced::advanced::Renderer,
{
    fn tag(&self) -> Tag {
        Tag::of::<State>()
    }

    fn state(&self) -> iced::advanced::widget::tree::State {
        iced::advanced::widget::tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        self.content.as_widget().size()
    }

    fn children(&self) -> Vec<Tree> {
        vec![Tree::new(&self.content)]
    }

    fn diff(&self, tree: &mut Tree) {
        tree.diff_children(std::slice::from_ref(&self.content));
    }

    fn layout(
        &mut self,
        tree: &mut Tree,
        renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        self.content
            .as_widget_mut()
            .layout(&mut tree.children[0], renderer, limits)
    }

    fn operate(
        &mut self,
        tree: &mut Tree,
        layout: Layout<'_>,
        renderer: &Renderer,
        operation: &mut dyn Operation,
    ) {
        self.content
            .as_widget_mut()
            .operate(&mut tree.children[0], layout, renderer, operation);
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        renderer: &Renderer,
        clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        viewport: &Rectangle,
    ) {
        let state = tree.state.downcast_mut::<State>();

        // Drag tracking runs before children so a drag that starts over the
        // image is never eaten by a scrollable underneath.
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_over(layout.bounds()) {
                    state.pressed = true;
                    state.press_pos = Some(pos);
                    state.last_pos = Some(pos);
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) if state.pressed => {
                if !state.dragging {
                    if let Some(press) = state.press_pos {
                        state.dragging = press.distance(*position) > DRAG_THRESHOLD;
                    }
                }
                if state.dragging {
                    if let (Some(last), Some(on_drag)) = (state.last_pos, self.on_drag.as_ref()) {
                        let (dx, dy) = (position.x - last.x, position.y - last.y);
                        state.last_pos = Some(*position);
                        if let Some(message) = on_drag(dx, dy) {
                            shell.publish(message);
                            shell.capture_event();
                            return;
                        }
                    }
                }
                state.last_pos = Some(*position);
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.release();
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if let (Some(on_scroll), true) =
                    (self.on_scroll.as_ref(), cursor.is_over(layout.bounds()))
                {
                    let y = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => *y,
                        mouse::ScrollDelta::Pixels { y, .. } => *y / 40.0,
                    };
                    if y.abs() > 0.001 {
                        if let Some(message) = on_scroll(y) {
                            shell.publish(message);
                            shell.capture_event();
                            return;
                        }
                    }
                }
            }
            _ => {}
        }

        self.content.as_widget_mut().update(
            &mut tree.children[0],
            event,
            layout,
            cursor,
            renderer,
            clipboard,
            shell,
            viewport,
        );

        if shell.is_event_captured() {
            return;
        }

        if let Event::Keyboard(keyboard::Event::KeyPressed { key, repeat, .. }) = event {
            if let Some(message) = (self.on_key_press)(key, *repeat) {
                shell.publish(message);
            }
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        style: &renderer::Style,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
    ) {
        self.content.as_widget().draw(
            &tree.children[0],
            renderer,
            theme,
            style,
            layout,
            cursor,
            viewport,
        );
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
        renderer: &Renderer,
    ) -> mouse::Interaction {
        let state = tree.state.downcast_ref::<State>();
        if state.dragging && self.on_drag.is_some() {
            return mouse::Interaction::Grabbing;
        }
        self.content
            .as_widget()
            .mouse_interaction(&tree.children[0], layout, cursor, viewport, renderer)
    }

    fn overlay<'b>(
        &'b mut self,
        tree: &'b mut Tree,
        layout: Layout<'b>,
        renderer: &Renderer,
        viewport: &Rectangle,
        translation: Vector,
    ) -> Option<overlay::Element<'b, Message, Theme, Renderer>> {
        self.content.as_widget_mut().overlay(
            &mut tree.children[0],
            layout,
            renderer,
            viewport,
            translation,
        )
    }
}

impl<'a, Message, Theme, Renderer> From<KeyListener<'a, Message, Theme, Renderer>>
    for Element<'a, Message, Theme, Renderer>
where
    Message: 'a,
    Theme: 'a,
    Renderer: iced::advanced::Renderer + 'a,
{
    fn from(listener: KeyListener<'a, Message, Theme, Renderer>) -> Self {
        Element::new(listener)
    }
}
