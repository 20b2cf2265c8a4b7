extern crate line_drawing;
extern crate std;
extern crate termion;

use std::error::Error;
use std::io::{stdin, stdout, Stdout, Write};
use std::sync::mpsc::channel;
use std::thread;
use std::time::{Duration, Instant};

use geo::Point;
use log::info;
use rand::Rng;
use termion::color;
use termion::event::{Event, Key};
use termion::input::{MouseTerminal, TermRead};
use termion::raw::{IntoRawMode, RawTerminal};

use segment_physics::utility::p;
use segment_physics::{
    FrameClock, Gate, GatePose, GeometryError, MoveIntent, Player, TetherStatus, World,
};

// world units per terminal cell
const UNITS_PER_COLUMN: f64 = 8.0;
const UNITS_PER_ROW: f64 = 16.0;
const STAR_COUNT: usize = 40;
const SPAWN: (f64, f64) = (100.0, 250.0);

fn build_level(world: &mut World) -> Result<Player, GeometryError> {
    let origin = p(0.0, 0.0);
    // ground
    world.segments.add_polygon(
        origin,
        &[p(1200.0, 300.0), p(-200.0, 300.0), p(-200.0, 400.0), p(1200.0, 400.0)],
    );
    // ramp up to the right
    world
        .segments
        .add_polygon(origin, &[p(600.0, 200.0), p(400.0, 300.0), p(600.0, 300.0)]);
    // wall at the far end
    world.segments.add_polygon(
        origin,
        &[p(1040.0, 100.0), p(1000.0, 100.0), p(1000.0, 300.0), p(1040.0, 300.0)],
    );
    let gate = Gate::new(
        &mut world.segments,
        p(800.0, 200.0),
        128.0,
        16.0,
        GatePose::new(0.0, 0.0, 0.0),
        GatePose::new(0.0, 0.0, 90.0),
        1.0,
    )?;
    world.add_gate(gate);
    Ok(Player::spawn(world, SPAWN.0, SPAWN.1))
}

struct Game {
    world: World,
    player: Player,
    clock: FrameClock,
    start: Instant,
    intent: MoveIntent,
    stdout: MouseTerminal<RawTerminal<Stdout>>,
    running: bool, // set false to quit
    stars: Vec<(u16, u16)>,
    last_status: TetherStatus,
}

impl Game {
    fn new_game() -> Result<Game, Box<dyn Error>> {
        let (width, height) = termion::terminal_size()?;
        let mut rng = rand::thread_rng();
        let stars = (0..STAR_COUNT)
            .map(|_| (rng.gen_range(0..width.max(1)), rng.gen_range(1..height.max(2))))
            .collect();
        let mut world = World::new();
        let player = build_level(&mut world)?;
        Ok(Game {
            world,
            player,
            clock: FrameClock::default(),
            start: Instant::now(),
            intent: MoveIntent::default(),
            stdout: MouseTerminal::from(stdout().into_raw_mode()?),
            running: true,
            stars,
            last_status: TetherStatus::Slack,
        })
    }

    fn restart(&mut self) -> Result<(), GeometryError> {
        info!("restarting level");
        self.world.clear();
        self.player = build_level(&mut self.world)?;
        self.intent = MoveIntent::default();
        self.last_status = TetherStatus::Slack;
        Ok(())
    }

    fn handle_input(&mut self, evt: Event) -> Result<(), Box<dyn Error>> {
        // terminals report presses only, so a direction stays held until changed
        if let Event::Key(ke) = evt {
            match ke {
                Key::Char('q') => self.running = false,
                Key::Char('a') | Key::Left => self.intent = MoveIntent::left(),
                Key::Char('d') | Key::Right => self.intent = MoveIntent::right(),
                Key::Char('s') | Key::Down => self.intent = MoveIntent::default(),
                Key::Char(' ') | Key::Up => {
                    self.player.jump(&mut self.world);
                }
                Key::Char('e') => self.world.toggle_gates(),
                Key::Char('r') => self.restart()?,
                _ => {}
            }
        }
        Ok(())
    }

    fn tick_physics(&mut self) -> Result<(), GeometryError> {
        let now_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        let mut respawn = false;
        for dt in self.clock.advance(now_ms) {
            let (status, fallen) = self.player.step(dt, self.intent, &mut self.world);
            self.last_status = status;
            if status == TetherStatus::Snapped || fallen {
                respawn = true;
                break;
            }
        }
        if respawn {
            self.restart()?;
        }
        Ok(())
    }

    fn to_screen(&self, point: Point<f64>, camera: Point<f64>, size: (u16, u16)) -> (i32, i32) {
        let rel = point - camera;
        (
            (rel.x() / UNITS_PER_COLUMN).round() as i32 + size.0 as i32 / 2,
            (rel.y() / UNITS_PER_ROW).round() as i32 + size.1 as i32 / 2,
        )
    }

    fn draw_glyph(&mut self, pos: (i32, i32), size: (u16, u16), glyph: char) -> std::io::Result<()> {
        // row 0 is the status line
        if pos.0 < 0 || pos.1 < 1 || pos.0 >= size.0 as i32 || pos.1 >= size.1 as i32 {
            return Ok(());
        }
        write!(
            self.stdout,
            "{}{}",
            termion::cursor::Goto(pos.0 as u16 + 1, pos.1 as u16 + 1),
            glyph
        )
    }

    fn draw_line(&mut self, pos0: (i32, i32), pos1: (i32, i32), size: (u16, u16), glyph: char) -> std::io::Result<()> {
        for cell in line_drawing::Bresenham::new(pos0, pos1) {
            self.draw_glyph(cell, size, glyph)?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), Box<dyn Error>> {
        let size = termion::terminal_size()?;
        let camera = self.player.position(&self.world).unwrap_or_else(|| p(SPAWN.0, SPAWN.1));
        write!(
            self.stdout,
            "{}{}{}",
            color::Fg(color::White),
            color::Bg(color::Black),
            termion::clear::All
        )?;

        write!(self.stdout, "{}", color::Fg(color::LightBlack))?;
        for star in self.stars.clone() {
            self.draw_glyph((star.0 as i32, star.1 as i32), size, '.')?;
        }

        write!(self.stdout, "{}", color::Fg(color::White))?;
        let lines: Vec<(Point<f64>, Point<f64>)> = self
            .world
            .segments
            .iter()
            .map(|(_, segment)| (segment.start(), segment.end()))
            .collect();
        for (start, end) in lines {
            let a = self.to_screen(start, camera, size);
            let b = self.to_screen(end, camera, size);
            self.draw_line(a, b, size, '█')?;
        }

        let player_state = self.world.body(self.player.body_id()).map(|body| {
            let attach = self.player.tether.attach_point(body);
            (body.position, self.player.tether.path(attach, &self.world.segments))
        });
        if let Some((position, path)) = player_state {
            write!(self.stdout, "{}", color::Fg(color::Yellow))?;
            for leg in path.windows(2) {
                let a = self.to_screen(leg[0], camera, size);
                let b = self.to_screen(leg[1], camera, size);
                self.draw_line(a, b, size, '·')?;
            }
            let glyph = if self.player.controller.facing_right { '>' } else { '<' };
            let pos = self.to_screen(position + p(0.0, -UNITS_PER_ROW / 2.0), camera, size);
            write!(self.stdout, "{}", color::Fg(color::LightGreen))?;
            self.draw_glyph(pos, size, glyph)?;
        }

        let grounded = self
            .world
            .body(self.player.body_id())
            .map(|body| body.is_grounded())
            .unwrap_or(false);
        write!(
            self.stdout,
            "{}{}a/d move  s stop  space jump  e gates  r restart  q quit | tether {:.0} {} | {}",
            termion::cursor::Goto(1, 1),
            color::Fg(color::White),
            self.player.tether.length(),
            self.last_status,
            if grounded { "grounded" } else { "airborne" },
        )?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let stdin = stdin();
    let mut game = Game::new_game()?;
    game.clock.advance(0.0);

    let (tx, rx) = channel();

    // Separate thread for reading input
    thread::spawn(move || {
        for evt in stdin.events().flatten() {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });

    while game.running {
        while let Ok(evt) = rx.try_recv() {
            game.handle_input(evt)?;
        }
        game.tick_physics()?;
        game.render()?;
        thread::sleep(Duration::from_millis(20));
    }
    write!(game.stdout, "{}{}", termion::clear::All, termion::cursor::Goto(1, 1))?;
    game.stdout.flush()?;
    Ok(())
}
