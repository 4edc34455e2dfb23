use crate::Message;
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Theme,
};
use sirstream::wire::{AgentStatus, Frame as SnapshotFrame, StatsSample};
use std::sync::Arc;

/// Side length of the square world the server simulates in.
const WORLD_SIZE: f32 = 500.0;

pub fn status_color(status: AgentStatus) -> Color {
    match status {
        AgentStatus::Susceptible => Color::from_rgb(0.20, 0.60, 0.86),
        AgentStatus::Infected => Color::from_rgb(0.91, 0.30, 0.24),
        AgentStatus::Recovered => Color::from_rgb(0.18, 0.80, 0.44),
    }
}

/// Agents drawn as colored points at their world position.
pub struct AgentField {
    pub frame: Option<Arc<SnapshotFrame>>,
}

impl canvas::Program<Message> for AgentField {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.06),
        );

        if let Some(snapshot) = &self.frame {
            let scale_x = bounds.width / WORLD_SIZE;
            let scale_y = bounds.height / WORLD_SIZE;
            for agent in &snapshot.agents {
                let center = Point::new(agent.x as f32 * scale_x, agent.y as f32 * scale_y);
                let marker = Path::new(|builder| builder.circle(center, 3.0));
                frame.fill(&marker, status_color(agent.status));
            }
        }

        vec![frame.into_geometry()]
    }
}

/// S/I/R counts over the history window, x keyed by step.
pub struct StatsChart {
    pub history: Vec<StatsSample>,
}

impl canvas::Program<Message> for StatsChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.02, 0.04),
        );

        for line in 1..4 {
            let y = bounds.height * (line as f32 / 4.0);
            let grid = Path::line(Point::new(0.0, y), Point::new(bounds.width, y));
            frame.stroke(
                &grid,
                Stroke::default().with_color(Color::from_rgb(0.25, 0.25, 0.3)),
            );
        }

        if let (Some(first), Some(last)) = (self.history.first(), self.history.last()) {
            let span = last.step.saturating_sub(first.step).max(1) as f32;
            let peak = self
                .history
                .iter()
                .map(StatsSample::total)
                .max()
                .unwrap_or(0)
                .max(1) as f32;

            for status in AgentStatus::ALL {
                let path = Path::new(|builder| {
                    for (i, sample) in self.history.iter().enumerate() {
                        let x =
                            sample.step.saturating_sub(first.step) as f32 / span * bounds.width;
                        let value = sample.count(status) as f32 / peak;
                        let y = bounds.height - value * bounds.height;
                        if i == 0 {
                            builder.move_to(Point::new(x, y));
                        } else {
                            builder.line_to(Point::new(x, y));
                        }
                    }
                });
                frame.stroke(
                    &path,
                    Stroke::default()
                        .with_width(2.0)
                        .with_color(status_color(status)),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}
