//! Flashprep command line interface.

use std::process;

use clap::{
    crate_description, crate_name, crate_version, value_t, App, AppSettings::*, Arg, ArgMatches,
    SubCommand,
};
use console::style;
use log::{debug, trace, LevelFilter};
use simplelog::*;

use flashprep::{self as fp, ConsoleReporter, HookRegistry, Reporter, SerialCapability};

fn main() {
    println!("[FP] flashprep v{}", crate_version!());

    ctrlc::set_handler(move || {
        println!("🛑 received Ctrl+C!");
        process::exit(0);
    })
    .expect("Failed to install my Ctrl-C handler!");

    let matches = App::new(crate_name!())
        .version(format!("v{}", crate_version!()).as_str())
        .about(crate_description!())
        .long_about(
            "\n\
            Flashprep hooks into a firmware build right before its upload and \
            compile steps. Before upload, it pulses the DTR/RTS control lines \
            of the serial upload port to force the device into its bootloader \
            (0.5s low, 0.5s high, 1.0s settle); the reset is best-effort and \
            never fails the build. Before compile, it regenerates \
            include/version.h with a calendar version and the build \
            date/time; that step is mandatory and a failed write aborts the \
            build.\n\
            \n\
            The `run` subcommand plays the role of the build orchestrator: it \
            registers both hooks in a registry and executes a lifecycle step \
            or named target with its pre-actions, leaving the actual firmware \
            transport to the real orchestrator.\
        ",
        )
        .max_term_width(80)
        .setting(ColoredHelp)
        .setting(NextLineHelp)
        .setting(SubcommandRequiredElseHelp)
        .arg(Arg::with_name("v").short("v").multiple(true).global(true).help(
            "Sets the logging level of verbosity, repeat several times for \
                higher verbosity",
        ))
        .subcommand(
            SubCommand::with_name("reset")
                .about("reset the device before upload (advisory, always succeeds)")
                .arg(tty_arg())
                .arg(baud_rate_arg()),
        )
        .subcommand(
            SubCommand::with_name("stamp")
                .about("generate include/version.h for the current date")
                .arg(project_dir_arg()),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("run a lifecycle step or named target with its registered hooks")
                .arg(
                    Arg::with_name("TARGET")
                        .help("the step or target to run")
                        .possible_values(&["compile", "upload", "reset_upload"])
                        .required(true)
                        .index(1),
                )
                .arg(tty_arg())
                .arg(baud_rate_arg())
                .arg(project_dir_arg()),
        )
        .get_matches();

    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'flashprep -v -v -v' or 'flashprep -vvv' vs 'flashprep -v'
    let log_level = match matches.occurrences_of("v") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    trace!("{:#?}", matches);

    let exit_code = match matches.subcommand() {
        ("reset", Some(sub)) => run_reset(sub),
        ("stamp", Some(sub)) => run_stamp(sub),
        ("run", Some(sub)) => run_hooks(sub),
        _ => unreachable!(),
    };
    debug!("exit code: {}", exit_code);
    process::exit(exit_code);
}

// Subcommands =================================================================

fn run_reset(matches: &ArgMatches<'_>) -> i32 {
    let settings = settings_from(matches);
    let mut reporter = ConsoleReporter;

    let mut handshake = fp::factory(settings, SerialCapability::probe());
    let outcome = handshake.run(&mut reporter);
    debug!("reset outcome: {:?}", outcome);

    // The reset is advisory; its outcome never changes the exit status.
    0
}

fn run_stamp(matches: &ArgMatches<'_>) -> i32 {
    let settings = settings_from(matches);
    let mut reporter = ConsoleReporter;

    // The project directory argument has a default value, so it is always
    // present here.
    let project_dir = settings.project_dir.as_deref().unwrap();
    match fp::generate(project_dir, &mut reporter) {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn run_hooks(matches: &ArgMatches<'_>) -> i32 {
    let settings = settings_from(matches);
    let mut reporter = ConsoleReporter;

    let mut registry = HookRegistry::new();
    fp::register(&mut registry, &settings);
    // Stand-in for the orchestrator's own upload action; the real firmware
    // transport is not part of flashprep.
    registry.set_step_action(
        fp::UPLOAD_STEP,
        Box::new(|reporter: &mut dyn Reporter| {
            reporter.info("Handing off to the orchestrator's upload transport");
            Ok(())
        }),
    );

    let target = matches.value_of("TARGET").unwrap();
    match registry.run_target(target, &mut reporter) {
        Ok(()) => 0,
        Err(err) => {
            debug!("target `{}` failed: {}", target, err);
            1
        }
    }
}

// Argument plumbing ===========================================================

fn tty_arg() -> Arg<'static, 'static> {
    Arg::with_name("DEVICE_TTY")
        .help("the USB tty device to reset")
        .long_help(
            "the USB tty device to reset; resolved by the build orchestrator \
             from its upload-target configuration. When not set, the reset \
             is skipped with a warning.",
        )
        .short("-t")
        .long("--tty")
        .takes_value(true)
        .require_equals(true)
}

fn baud_rate_arg() -> Arg<'static, 'static> {
    Arg::with_name("BAUD_RATE")
        .help("serial control channel baud rate")
        .short("-b")
        .long("--baud-rate")
        .takes_value(true)
        .default_value("115200")
        .require_equals(true)
}

fn project_dir_arg() -> Arg<'static, 'static> {
    Arg::with_name("PROJECT_DIR")
        .help("root directory of the firmware project")
        .short("-p")
        .long("--project-dir")
        .takes_value(true)
        .default_value(".")
        .require_equals(true)
}

/// Build `Settings` from whatever arguments the subcommand carries.
fn settings_from(matches: &ArgMatches<'_>) -> fp::Settings {
    let mut builder = fp::SettingsBuilder::new();

    if matches.is_present("BAUD_RATE") {
        let baud_rate = value_t!(matches.value_of("BAUD_RATE"), u32).unwrap_or_else(|_| {
            println!(
                "{}: `{}` needs to be a numeric value",
                style("error").red(),
                style("baud-rate").cyan()
            );
            println!(
                "   {} `{}` is not a valid value",
                style("-->").cyan(),
                style(matches.value_of("BAUD_RATE").unwrap()).on_red()
            );
            process::exit(-1);
        });
        builder = builder.baud_rate(baud_rate);
    }

    if let Some(tty) = matches.value_of("DEVICE_TTY") {
        builder = builder.path(tty);
    }
    if let Some(project_dir) = matches.value_of("PROJECT_DIR") {
        builder = builder.project_dir(project_dir);
    }

    builder.finalize()
}
