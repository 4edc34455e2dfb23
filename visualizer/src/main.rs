use canvas::{status_color, AgentField, StatsChart};
use form::ParameterForm;
use iced::{
    time,
    widget::{button, column, row, scrollable, text, text_input, Canvas, Column, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use sirstream::render::{SharedView, ViewModel};
use sirstream::wire::AgentStatus;
use sirstream::{ParamField, SessionConfig, SessionHandle, SessionState};
use std::time::Duration;

mod canvas;
mod form;
mod session;

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "SIR Live Visualizer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_millis(100)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    form: ParameterForm,
    session: Result<SessionHandle, String>,
    shared: SharedView,
    view: ViewModel,
    stream_url: String,
    history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Message {
    Tick,
    FieldChanged(ParamField, String),
    Start,
    Stop,
    Reset,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        let mut config = SessionConfig::default();
        if let Ok(base_url) = std::env::var("SIRSTREAM_BASE_URL") {
            config.base_url = base_url;
        }
        let shared = SharedView::new();
        let session = session::spawn_session(&config, &shared);
        let greeting = match &session {
            Ok(_) => format!("Ready: {}", config.stream_url()),
            Err(err) => format!("Session unavailable: {err}"),
        };
        let mut visualizer = Visualizer {
            form: ParameterForm::new(&config.parameters),
            session,
            shared,
            view: ViewModel::default(),
            stream_url: config.stream_url(),
            history: Vec::new(),
        };
        visualizer.push_history(greeting);
        (visualizer, Task::none())
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                if state.shared.revision() != state.view.revision {
                    let next = state.shared.snapshot();
                    if next.state != state.view.state {
                        state.push_history(next.state.describe());
                    }
                    state.view = next;
                }
            }
            Message::FieldChanged(field, value) => state.form.update_field(field, value),
            Message::Start => {
                if let Ok(handle) = &state.session {
                    for (field, value) in state.form.fields() {
                        handle.set_param(field, value);
                    }
                    handle.start();
                }
            }
            Message::Stop => {
                if let Ok(handle) = &state.session {
                    handle.stop();
                }
            }
            Message::Reset => {
                if let Ok(handle) = &state.session {
                    handle.reset();
                }
            }
        }
        Task::none()
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let inputs = state.form.fields().fold(
            Column::new().spacing(8),
            |col, (field, value)| {
                let hint = match state.form.problem(field) {
                    Some(problem) => text(format!("invalid: {problem}")).size(12),
                    None => text(ParameterForm::step_hint(field)).size(12),
                };
                col.push(
                    column![
                        text(field.label()).size(14),
                        text_input(field.label(), value)
                            .on_input(move |value| Message::FieldChanged(field, value))
                            .padding(6),
                        hint,
                    ]
                    .spacing(2),
                )
            },
        );

        let (primary_label, primary_message) = primary_action(&state.view.state);
        let primary = button(primary_label).on_press(primary_message).padding(10);
        let status = if state.view.status.is_empty() {
            state.view.state.describe()
        } else {
            state.view.status.clone()
        };

        let controls_column = column![
            text("Live Controls").size(26),
            inputs,
            row![primary, button("Reset").on_press(Message::Reset).padding(10)].spacing(10),
            text(status).size(14),
            text(state.stream_url.as_str()).size(12),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(320.0));

        let step_label = match &state.view.frame {
            Some(frame) => text(format!(
                "Live Step: {} ({} agents)",
                frame.step,
                frame.agents.len()
            ))
            .size(18),
            None => text("Live Step: n/a").size(18),
        };

        let agents = Canvas::new(AgentField {
            frame: state.view.frame.clone(),
        })
        .width(Length::Fixed(500.0))
        .height(Length::Fixed(500.0));

        let chart = Canvas::new(StatsChart {
            history: state.view.history.clone(),
        })
        .width(Length::Fill)
        .height(Length::Fixed(220.0));

        let latest = state.view.history.last();
        let legend = AgentStatus::ALL
            .into_iter()
            .fold(row![].spacing(16), |legend, status| {
                let label = match latest.map(|sample| sample.count(status)) {
                    Some(count) => format!("{}: {}", status.label(), count),
                    None => status.label().to_string(),
                };
                legend.push(text(label).size(14).color(status_color(status)))
            });

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let telemetry_column = column![
            text("Simulation").size(26),
            step_label,
            agents,
            text(format!("Compartments (last {} samples)", state.view.history.len())).size(16),
            chart,
            legend,
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![controls_column, telemetry_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

/// Label and message of the main control. A pending handshake can be cancelled.
fn primary_action(state: &SessionState) -> (&'static str, Message) {
    match state {
        SessionState::Connecting => ("Cancel", Message::Stop),
        SessionState::Playing => ("Stop", Message::Stop),
        SessionState::Idle | SessionState::Error(_) => ("Start", Message::Start),
    }
}
