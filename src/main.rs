extern crate anyhow;
extern crate chrono;
extern crate clap;
extern crate educollab;
extern crate termion;
extern crate tracing_subscriber;

use anyhow::{anyhow, bail};
use chrono::{DateTime, Duration, Utc};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use educollab::assignment::{Assignment, AssignmentDraft};
use educollab::clock::{Clock, RecordId, SystemClock};
use educollab::collaboration::CollaborationDraft;
use educollab::config::Config;
use educollab::dashboard::{self, Overview, UpcomingItem};
use educollab::leaderboard::{self, Tab};
use educollab::panel;
use educollab::profile::RandomProfileGenerator;
use educollab::query::{AssignmentQuery, SortKey, TypeFilter, Urgency};
use educollab::routes::{self, Route, RouteDecision};
use educollab::storage::FileStorage;
use educollab::submission::SubmissionDraft;
use educollab::user::{Role, User};
use educollab::{HubError, PlatformStore, Session, SessionStore};
use std::io::Write;
use termion::color;
use tracing_subscriber::EnvFilter;

type Sessions = SessionStore<FileStorage, RandomProfileGenerator, SystemClock>;
type Platform = PlatformStore<SystemClock>;

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn highlight<T: std::fmt::Display>(text: T) -> String {
    format!(
        "{}{}{}",
        color::Fg(color::Blue),
        text,
        color::Fg(color::Reset)
    )
}

fn warning<T: std::fmt::Display>(text: T) -> String {
    format!("{}{}{}", color::Fg(color::Red), text, color::Fg(color::Reset))
}

fn urgency_label(urgency: Urgency) -> String {
    if urgency.is_urgent() {
        warning(urgency)
    } else {
        urgency.to_string()
    }
}

fn require_user(sessions: &Sessions) -> Result<&User, HubError> {
    sessions.current_user().ok_or(HubError::NoActiveSession)
}

/// Accepts a number of days from now or an RFC 3339 instant.
fn parse_due(raw: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(days) = raw.trim().parse::<i64>() {
        return Duration::try_days(days)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| anyhow!("due date {} days from now is out of range", days));
    }
    let due = DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|err| anyhow!("due date {:?} is neither days nor RFC 3339: {}", raw, err))?;
    Ok(due.with_timezone(&Utc))
}

fn print_assignments(view: &[&Assignment], now: DateTime<Utc>) {
    println!(
        "{} assignment{}",
        view.len(),
        if view.len() != 1 { "s" } else { "" }
    );
    for assignment in view {
        println!(
            "{} [{}] {} ({})",
            highlight(format!("#{}", assignment.id)),
            assignment.kind,
            assignment.title,
            assignment.difficulty
        );
        println!("    {}", assignment.description);
        println!(
            "    Due: {} | {} | {} | {} points | {}/{} submitted",
            assignment.due_date.format("%Y-%m-%d"),
            urgency_label(Urgency::classify(assignment.due_date, now)),
            assignment.professor,
            assignment.points,
            assignment.submissions,
            assignment.total_students
        );
        if !assignment.tags.is_empty() {
            let tags: Vec<String> = assignment.tags.iter().map(|t| format!("#{}", t)).collect();
            println!("    {}", tags.join(" "));
        }
    }
    if view.is_empty() {
        println!("No assignments found. Try adjusting your search or filter criteria.");
    }
}

fn show_notifications(platform: &Platform, now: DateTime<Utc>) {
    let items = panel::items(platform, now);
    println!(
        "Notifications ({} unread)",
        highlight(platform.unread_count())
    );
    if items.is_empty() {
        println!("🔔 No notifications yet");
    }
    for item in items {
        let marker = if item.unread { warning("●") } else { " ".to_string() };
        println!(
            "{} {} #{} {}: {} ({})",
            marker, item.icon, item.id, item.title, item.message, item.age
        );
    }
}

fn print_upcoming(upcoming: &[UpcomingItem]) {
    for item in upcoming {
        println!(
            "    #{} {} | {} | {} points",
            item.id,
            item.title,
            urgency_label(item.urgency),
            item.points
        );
    }
}

fn show_dashboard(
    sessions: &Sessions,
    platform: &Platform,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let user = require_user(sessions)?;
    match dashboard::overview(user, platform.assignments(), now) {
        Overview::Student {
            greeting,
            level,
            xp,
            badges,
            upcoming,
        } => {
            println!("{}", highlight(greeting));
            println!("Level {} | {} XP | {} Badges", level, xp, badges);
            println!("Upcoming assignments:");
            print_upcoming(&upcoming);
        }
        Overview::Professor {
            greeting,
            active_assignments,
            average_completion,
            upcoming,
        } => {
            println!("{}", highlight(greeting));
            println!(
                "Active assignments: {} | Average completion: {:.0}%",
                active_assignments,
                average_completion * 100.0
            );
            println!("Upcoming deadlines:");
            print_upcoming(&upcoming);
        }
        Overview::Mentor { greeting } => {
            println!("{}", highlight(greeting));
        }
    }
    println!("Unread notifications: {}", platform.unread_count());
    for item in routes::navigation(user.role) {
        println!("  {:<20} {}", item.name, item.href);
    }
    Ok(())
}

fn show_leaderboard(sessions: &Sessions, tab: Tab) -> anyhow::Result<()> {
    let user = require_user(sessions)?;
    let board = leaderboard::standings(tab, user, sessions.config());
    if let Some(rank) = leaderboard::user_rank(&board) {
        println!("{}: rank #{} | {} XP | Level {}", user.name, rank, user.xp, user.level);
    }
    for standing in &board {
        let line = format!(
            "{:>3} {:<20} {:>5} XP  Level {:<3} {} badges",
            leaderboard::rank_icon(standing.rank),
            standing.entry.name,
            standing.entry.xp,
            standing.entry.level,
            standing.entry.badges
        );
        if standing.entry.is_current_user {
            println!("{}", highlight(line));
        } else {
            println!("{}", line);
        }
    }
    println!("Badges:");
    for (badge, earned) in leaderboard::badge_catalog(user) {
        println!(
            "  {} {:<14} {}{}",
            badge.icon,
            badge.name,
            badge.description,
            if earned { " (earned)" } else { "" }
        );
    }
    Ok(())
}

fn show_session(session: &Session) {
    match *session {
        Session::LoggedOut => println!("Not logged in"),
        Session::LoggedIn(ref user) => {
            println!("{} <{}> ({})", highlight(&user.name), user.email, user.role);
            println!("  {} since {}", user.institution, user.joined_at.format("%Y-%m-%d"));
            if user.is_student() {
                let badges: Vec<&str> = user.badges.iter().map(|b| b.as_str()).collect();
                println!("  Level {} | {} XP | badges: {}", user.level, user.xp, badges.join(", "));
            }
        }
    }
}

fn create_assignment(
    matches: &ArgMatches,
    sessions: &Sessions,
    platform: &mut Platform,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let user = require_user(sessions)?;
    if user.role != Role::Professor {
        bail!("only professors can create assignments");
    }

    let mut draft = AssignmentDraft::new(
        matches.value_of("title").unwrap_or(""),
        matches.value_of("description").unwrap_or(""),
        parse_due(matches.value_of("due").unwrap_or("7"), now)?,
    );
    draft.professor = user.name.clone();
    if let Some(kind) = matches.value_of("kind") {
        draft.kind = kind.parse()?;
    }
    if let Some(points) = matches.value_of("points") {
        draft.points = points
            .parse()
            .map_err(|_| anyhow!("points must be a positive number"))?;
    }
    if let Some(difficulty) = matches.value_of("difficulty") {
        draft.difficulty = difficulty.parse()?;
    }
    if let Some(tags) = matches.values_of("tag") {
        draft.tags = tags.map(|t| t.to_string()).collect();
    }
    if let Some(instructions) = matches.value_of("instructions") {
        draft.instructions = instructions.to_string();
    }

    let created = platform.add_assignment(draft)?;
    println!("Created assignment #{}", created.id);
    let view: Vec<&Assignment> = platform.assignments().iter().collect();
    print_assignments(&view, now);
    Ok(())
}

fn show_route(path: &str, sessions: &Sessions, platform: &Platform, now: DateTime<Utc>) {
    match routes::guard(Route::parse(path), sessions.session()) {
        RouteDecision::Render(Route::Assignment(id)) => match platform.find_assignment(id) {
            Some(assignment) => {
                print_assignments(&[assignment], now);
                println!("    {} submission(s) this session", platform.submissions_for(id).len());
            }
            None => println!("{}", warning(format!("assignment #{} not found", id))),
        },
        RouteDecision::Render(Route::Collaboration(id)) => match platform.find_collaboration(id) {
            Some(room) => println!("{} ({} members)", highlight(&room.name), room.members.len()),
            None => println!("{}", warning(format!("collaboration #{} not found", id))),
        },
        RouteDecision::Render(route) => println!("render {:?}", route),
        RouteDecision::Redirect(to) => println!("redirect to {}", to),
        RouteDecision::NotFound => println!("{}", warning("not found")),
    }
}

fn submit(argument: &str, sessions: &Sessions, platform: &mut Platform) -> anyhow::Result<()> {
    let user = require_user(sessions)?;
    if !user.is_student() {
        bail!("only students submit assignments");
    }
    let mut words = argument.splitn(2, ' ');
    let assignment_id: RecordId = words
        .next()
        .unwrap_or("")
        .parse()
        .map_err(|_| anyhow!("usage: s <assignment id> [content]"))?;
    if platform.find_assignment(assignment_id).is_none() {
        bail!("assignment #{} not found", assignment_id);
    }
    let submission = platform.add_submission(SubmissionDraft {
        assignment_id,
        student_id: user.id.clone(),
        content: words.next().unwrap_or("").to_string(),
        files: vec![],
    });
    println!("Submitted #{} at {}", submission.id, submission.timestamp.format("%Y-%m-%d %H:%M"));
    Ok(())
}

fn open_room(argument: &str, sessions: &Sessions, platform: &mut Platform) -> anyhow::Result<()> {
    let user = require_user(sessions)?;
    if argument.is_empty() {
        bail!("usage: c <room name>");
    }
    let room = platform.add_collaboration(CollaborationDraft {
        name: argument.to_string(),
        assignment_id: None,
        members: vec![user.name.clone()],
    });
    println!("Opened room #{}, visit /collaboration/{}", room.id, room.id);
    Ok(())
}

fn query_from(matches: &ArgMatches) -> anyhow::Result<AssignmentQuery> {
    Ok(AssignmentQuery::new(
        matches.value_of("search").unwrap_or(""),
        matches.value_of("kind").unwrap_or("all").parse::<TypeFilter>()?,
        matches.value_of("sort").unwrap_or("dueDate").parse::<SortKey>()?,
    ))
}

fn print_help() {
    println!("a [search]  list assignments matching search");
    println!("s <id> [t]  submit to an assignment");
    println!("c <name>    open a collaboration room");
    println!("g <path>    go to a path");
    println!("n           show notifications");
    println!("r <id>      open (mark read) a notification");
    println!("l           leaderboard");
    println!("d           dashboard");
    println!("w           who am I");
    println!("q           quit");
}

/// Interactive session where the platform store lives as long as the loop.
fn command_loop(
    sessions: &Sessions,
    platform: &mut Platform,
    clock: &SystemClock,
) -> anyhow::Result<()> {
    print_help();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let mut words = line.trim().splitn(2, ' ');
        let command = words.next().unwrap_or("").to_lowercase();
        let argument = words.next().unwrap_or("").trim();
        let now = clock.now();

        let outcome = match command.as_ref() {
            "q" => break,
            "" => Ok(()),
            "a" => {
                let query = AssignmentQuery::new(argument, TypeFilter::All, SortKey::DueDate);
                print_assignments(&query.apply(platform.assignments()), now);
                Ok(())
            }
            "n" => {
                show_notifications(platform, now);
                Ok(())
            }
            "r" => match argument.parse::<RecordId>() {
                Ok(id) => {
                    if !panel::click(platform, id) {
                        println!("Notification #{} is already read or does not exist", id);
                    }
                    Ok(())
                }
                Err(_) => Err(anyhow!("usage: r <notification id>")),
            },
            "s" => submit(argument, sessions, platform),
            "c" => open_room(argument, sessions, platform),
            "g" => {
                show_route(argument, sessions, platform, now);
                Ok(())
            }
            "l" => show_leaderboard(sessions, Tab::Overall),
            "d" => show_dashboard(sessions, platform, now),
            "w" => {
                show_session(sessions.session());
                Ok(())
            }
            _ => {
                print_help();
                Ok(())
            }
        };
        if let Err(err) = outcome {
            println!("{}", warning(err));
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = App::new("EduCollab Local")
        .version("0.1")
        .author("Scott Moeller <electronjoe@gmail.com>")
        .about("Command line EduCollab client keeping its session in a local JSON store")
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .help("TOML configuration file")
                .takes_value(true)
                .global(true),
        ).arg(
            Arg::with_name("storage")
                .long("storage")
                .help("Session storage file, overrides the configuration")
                .takes_value(true)
                .global(true),
        ).arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Debug logging on stderr")
                .global(true),
        ).subcommand(
            SubCommand::with_name("login")
                .about("Starts a session")
                .arg(
                    Arg::with_name("email")
                        .short("e")
                        .long("email")
                        .takes_value(true)
                        .required(true),
                ).arg(
                    Arg::with_name("password")
                        .short("p")
                        .long("password")
                        .takes_value(true)
                        .required(true),
                ).arg(
                    Arg::with_name("role")
                        .short("r")
                        .long("role")
                        .takes_value(true)
                        .possible_values(&["student", "professor", "mentor"])
                        .default_value("student"),
                ),
        ).subcommand(SubCommand::with_name("logout").about("Ends the current session"))
        .subcommand(SubCommand::with_name("whoami").about("Shows the current session"))
        .subcommand(
            SubCommand::with_name("assignments")
                .about("Searches, filters and sorts assignments")
                .arg(
                    Arg::with_name("search")
                        .short("s")
                        .long("search")
                        .takes_value(true),
                ).arg(
                    Arg::with_name("kind")
                        .short("k")
                        .long("kind")
                        .takes_value(true)
                        .possible_values(&["all", "individual", "group"]),
                ).arg(
                    Arg::with_name("sort")
                        .short("o")
                        .long("sort")
                        .takes_value(true)
                        .possible_values(&["dueDate", "points", "title"]),
                ),
        ).subcommand(
            SubCommand::with_name("create-assignment")
                .about("Creates an assignment (professors only)")
                .arg(
                    Arg::with_name("title")
                        .short("t")
                        .long("title")
                        .takes_value(true)
                        .required(true),
                ).arg(
                    Arg::with_name("description")
                        .short("d")
                        .long("description")
                        .takes_value(true)
                        .required(true),
                ).arg(
                    Arg::with_name("due")
                        .long("due")
                        .help("Days from now, or an RFC 3339 instant")
                        .takes_value(true)
                        .default_value("7"),
                ).arg(
                    Arg::with_name("kind")
                        .short("k")
                        .long("kind")
                        .takes_value(true)
                        .possible_values(&["individual", "group"]),
                ).arg(
                    Arg::with_name("points")
                        .long("points")
                        .takes_value(true),
                ).arg(
                    Arg::with_name("difficulty")
                        .long("difficulty")
                        .takes_value(true)
                        .possible_values(&["beginner", "intermediate", "advanced", "expert"]),
                ).arg(
                    Arg::with_name("tag")
                        .long("tag")
                        .multiple(true)
                        .number_of_values(1)
                        .takes_value(true),
                ).arg(
                    Arg::with_name("instructions")
                        .long("instructions")
                        .takes_value(true),
                ),
        ).subcommand(
            SubCommand::with_name("notifications")
                .about("Lists notifications")
                .arg(
                    Arg::with_name("read")
                        .long("read")
                        .help("Notification id to open")
                        .takes_value(true),
                ),
        ).subcommand(
            SubCommand::with_name("leaderboard")
                .about("Shows the gamification leaderboard")
                .arg(
                    Arg::with_name("tab")
                        .long("tab")
                        .takes_value(true)
                        .possible_values(&["overall", "weekly"])
                        .default_value("overall"),
                ),
        ).subcommand(SubCommand::with_name("dashboard").about("Shows the overview for your role"))
        .subcommand(
            SubCommand::with_name("route")
                .about("Checks whether the current session may open a path")
                .arg(Arg::with_name("path").required(true).index(1)),
        ).get_matches();

    init_tracing(matches.is_present("verbose"));

    let mut config = match matches.value_of("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(storage) = matches.value_of("storage") {
        config.storage_path = storage.into();
    }

    let clock = SystemClock;
    let storage = FileStorage::open(&config.storage_path)?;
    let mut sessions: Sessions =
        SessionStore::open(storage, RandomProfileGenerator, clock, config.clone())?;
    let mut platform: Platform = PlatformStore::new(clock, config.default_total_students);
    let now = clock.now();

    match matches.subcommand() {
        ("login", Some(m)) => {
            let role: Role = m.value_of("role").unwrap_or("student").parse()?;
            let user = sessions.login(
                m.value_of("email").unwrap_or(""),
                m.value_of("password").unwrap_or(""),
                role,
            )?;
            println!("Logged in, continue at {}", highlight(role.dashboard_path()));
            show_session(&Session::LoggedIn(user));
        }
        ("logout", _) => {
            sessions.logout()?;
            println!("Logged out");
        }
        ("whoami", _) => show_session(sessions.session()),
        ("assignments", Some(m)) => {
            let query = query_from(m)?;
            print_assignments(&query.apply(platform.assignments()), now);
        }
        ("create-assignment", Some(m)) => create_assignment(m, &sessions, &mut platform, now)?,
        ("notifications", Some(m)) => {
            if let Some(raw) = m.value_of("read") {
                let id: RecordId = raw
                    .parse()
                    .map_err(|_| anyhow!("notification id must be a number"))?;
                panel::click(&mut platform, id);
            }
            show_notifications(&platform, now);
        }
        ("leaderboard", Some(m)) => {
            let tab: Tab = m.value_of("tab").unwrap_or("overall").parse()?;
            show_leaderboard(&sessions, tab)?;
        }
        ("dashboard", _) => show_dashboard(&sessions, &platform, now)?,
        ("route", Some(m)) => {
            show_route(m.value_of("path").unwrap_or("/"), &sessions, &platform, now);
        }
        _ => {
            println!("{}", highlight("Loading EduCollabHub..."));
            std::thread::sleep(std::time::Duration::from_millis(config.startup_delay_ms));
            show_session(sessions.session());
            command_loop(&sessions, &mut platform, &clock)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_parse_due_days_and_instants() {
        let table = vec![
            ("7", now() + Duration::days(7)),
            (" 0 ", now()),
            ("-1", now() - Duration::days(1)),
            (
                "2026-12-01T17:00:00+02:00",
                Utc.with_ymd_and_hms(2026, 12, 1, 15, 0, 0).unwrap(),
            ),
        ];
        for (i, (raw, expected)) in table.into_iter().enumerate() {
            assert_eq!(parse_due(raw, now()).unwrap(), expected, "row {}", i);
        }
    }

    #[test]
    fn test_parse_due_rejects_out_of_range_and_garbage() {
        for raw in &["99999999999999", "-99999999999999", "next week"] {
            assert!(parse_due(raw, now()).is_err(), "{:?}", raw);
        }
    }
}
