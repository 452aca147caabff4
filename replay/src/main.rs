#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod intent;
mod readout;

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use structopt::StructOpt;

use playback::{Phase, Playback, PlaybackConfig, WallClock};
use route::Route;

use self::intent::Intent;

// How often to check for due ticks and new commands. Much finer than the tick period.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(StructOpt)]
struct Args {
    /// The path to a recorded route, as .json or .csv
    #[structopt(long)]
    route: Option<String>,
    /// The path to a JSON file with playback settings
    #[structopt(long)]
    config: Option<String>,
    /// Start playing immediately, and quit once the route is finished
    #[structopt(long)]
    autoplay: bool,
}

impl Args {
    // Playback copes with an empty route, so don't give up if loading fails
    fn load_route(&self) -> Route {
        let path = match self.route {
            Some(ref path) => path,
            None => {
                warn!("No --route specified; nothing to replay");
                return Route::empty();
            }
        };
        match route::load_path(path) {
            Ok(route) => route,
            Err(err) => {
                error!("Couldn't load {}: {:#}", path, err);
                Route::empty()
            }
        }
    }

    fn load_config(&self) -> PlaybackConfig {
        let path = match self.config {
            Some(ref path) => path,
            None => return PlaybackConfig::default(),
        };
        match read_config(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("Using default settings; couldn't read {}: {:#}", path, err);
                PlaybackConfig::default()
            }
        }
    }
}

fn read_config(path: &str) -> Result<PlaybackConfig> {
    let bytes = fs_err::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn main() {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());
    let config = args.load_config();
    let mut playback = Playback::new(args.load_route(), WallClock::new(), &config);
    info!(
        "Replaying {} fixes, one every {}",
        abstutil::prettyprint_usize(playback.route_len()),
        config.tick_period()
    );

    let intents = intent::listen_stdin();
    if args.autoplay {
        playback.play();
    }
    println!("{}", readout::describe(&playback));

    run(&mut playback, &intents, args.autoplay);
}

fn run(playback: &mut Playback<WallClock>, intents: &Receiver<Intent>, autoplay: bool) {
    let mut stdin_open = true;
    loop {
        loop {
            match intents.try_recv() {
                Ok(intent) => {
                    match intent {
                        Intent::Play => playback.play(),
                        Intent::Pause => playback.pause(),
                        Intent::Toggle => playback.toggle(),
                        Intent::Reset => playback.reset(),
                        Intent::Quit => return,
                    }
                    println!("{}", readout::describe(playback));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    stdin_open = false;
                    break;
                }
            }
        }

        if playback.update() > 0 {
            println!("{}", readout::describe(playback));
        }

        if !playback.is_running() {
            if !stdin_open {
                info!("Input closed and playback isn't running; done");
                return;
            }
            if autoplay && playback.phase() == Phase::Finished {
                info!("Reached the end of the route");
                return;
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}
