use handswarm::messages::FINGER_MESSAGES;
use handswarm::script::TrackingScript;
use handswarm::{AnimationSession, CurlTemplateMatcher, SwarmConfig};
use log::error;
use std::time::Instant;

const IDLE_TICKS: u32 = 300;

struct Args {
    script: Option<String>,
    config: Option<String>,
    matcher: bool,
    messages: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        script: None,
        config: None,
        matcher: false,
        messages: false,
    };

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                args.config = Some(it.next().ok_or("--config needs a path")?);
            }
            "--matcher" => args.matcher = true,
            "--messages" => args.messages = true,
            "-h" | "--help" => {
                return Err("usage: handswarm [SCRIPT.json] [--config CONFIG.json] [--matcher] [--messages]"
                    .into())
            }
            path if args.script.is_none() => args.script = Some(path.to_string()),
            other => return Err(format!("unexpected argument '{}'", other)),
        }
    }
    Ok(args)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };

    if args.messages {
        match serde_json::to_string_pretty(&FINGER_MESSAGES[..]) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("{}", e),
        }
        return;
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Replay a tracking script through a fresh session
fn run(args: &Args) -> handswarm::Result<()> {
    let config = match &args.config {
        Some(path) => SwarmConfig::from_file(path)?,
        None => SwarmConfig::default(),
    };

    let script = match &args.script {
        Some(path) => TrackingScript::from_file(path)?,
        None => TrackingScript::idle(IDLE_TICKS),
    };

    println!("\n🧊 Handswarm");
    println!(
        "   {} particles (size {}), {} frames, {} ticks",
        config.particle_count,
        config.particle_size,
        script.frames.len(),
        script.total_ticks()
    );

    let started = Instant::now();
    let mut session = AnimationSession::new(&config);
    if args.matcher {
        session.set_template_matcher(Box::new(CurlTemplateMatcher::default()));
    }
    println!("   shapes generated in {:.2?}", started.elapsed());

    let mut transitions = 0;
    let mut redraws = 0u64;
    let replay = Instant::now();

    for frame in &script.frames {
        let before = session.gesture();
        if session.on_tracking_update(&frame.hands) != before {
            transitions += 1;
        }

        for _ in 0..frame.ticks {
            session.tick();
            if session.take_needs_redraw() {
                redraws += 1;
            }
        }
    }

    println!("\n✨ Replay finished in {:.2?}", replay.elapsed());
    println!("   transitions:       {}", transitions);
    println!("   redraws:           {}", redraws);
    println!("   final gesture:     {}", session.gesture());
    println!("   animation time:    {:.2}", session.machine().time());
    println!("   mean dist/target:  {:.3}", session.mean_target_distance());

    Ok(())
}
