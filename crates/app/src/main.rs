use std::io::{self, BufRead, Write};
use std::path::Path;

use services::{
    AddOutcome, AddStatus, AppServices, BankConfig, BankSource, CardFront, Clock,
    FlashcardSession, ImageUpload, Persisted, QuizPhase, RemoveTarget,
};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vocab_core::PoolSources;
use vocab_core::model::VocabularyEntry;

mod args;

use args::{Args, Command, print_usage, sqlite_file_path};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> AppResult<()> {
    let parsed = Args::parse(std::env::args().skip(1), std::env::var("VOCAB_DB_URL").ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let config = match &parsed.api_base {
        Some(raw) => BankConfig::new(raw)?,
        None => BankConfig::from_env()?,
    };

    // Open + migrate SQLite at startup; services only see the store trait.
    ensure_db_file(&parsed.db_url)?;
    let app = AppServices::new_sqlite(&parsed.db_url, Clock::system(), config).await?;
    info!(db = %parsed.db_url, "local store ready");

    match parsed.command {
        Command::Words => list_words(&app).await,
        Command::Add {
            source,
            target,
            transliteration,
        } => {
            let entry = VocabularyEntry::new(source, target, transliteration)?;
            let outcome = app.word_bank().add(entry).await?;
            print_outcome(&outcome);
            Ok(())
        }
        Command::Translate { source } => {
            let outcome = app.word_bank().add_translated(&source).await?;
            print_outcome(&outcome);
            Ok(())
        }
        Command::Scan { image } => {
            let upload = read_image(&image)?;
            let scan = app.word_bank().add_scanned(&upload).await?;
            if let Some(percent) = scan.identification.confidence_percent() {
                println!("identified with {percent}% confidence");
            }
            print_outcome(&scan.outcome);
            Ok(())
        }
        Command::Remove(target) => {
            if app.word_bank().remove(target).await? {
                println!("removed");
            } else {
                match target {
                    RemoveTarget::Remote(id) => println!("no word with id {id}"),
                    RemoveTarget::Local(position) => println!("no word at position {position}"),
                }
            }
            Ok(())
        }
        Command::Quiz { count, sources } => run_quiz(&app, count, sources).await,
        Command::Cards { sources } => run_cards(&app, sources).await,
        Command::Token(token) => {
            app.set_access_token(token.as_deref()).await?;
            if token.is_some() {
                println!("signed in");
            } else {
                println!("signed out");
            }
            Ok(())
        }
        Command::Help => Ok(()),
    }
}

async fn list_words(app: &AppServices) -> AppResult<()> {
    let loaded = app.word_bank().load().await;
    let origin = match loaded.source {
        BankSource::Remote => "server",
        BankSource::Cache => "offline cache",
    };
    println!(
        "{} saved words from {origin} ({} defaults built in)",
        loaded.my_list_count, loaded.default_count
    );
    for (position, entry) in loaded.entries.iter().enumerate() {
        let id = entry.id().map(|id| format!("  #{id}")).unwrap_or_default();
        println!("{position:>4}  {}{id}", describe(entry));
    }
    Ok(())
}

fn describe(entry: &VocabularyEntry) -> String {
    match entry.transliteration() {
        Some(hint) => format!(
            "{} -> {} ({hint})",
            entry.source_text(),
            entry.target_text()
        ),
        None => format!("{} -> {}", entry.source_text(), entry.target_text()),
    }
}

fn print_outcome(outcome: &AddOutcome) {
    let status = match outcome.status {
        AddStatus::Added => "added",
        AddStatus::Exists => "already saved",
    };
    let place = match outcome.persisted {
        Persisted::Remote => "server",
        Persisted::Local => "this device only",
    };
    println!("{status}: {} [{place}]", describe(&outcome.entry));
}

fn read_image(path: &Path) -> AppResult<ImageUpload> {
    let bytes = std::fs::read(path)?;
    let mime_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("capture.jpg")
        .to_string();
    Ok(ImageUpload {
        bytes,
        file_name,
        mime_type: mime_type.to_string(),
    })
}

//
// ─── INTERACTIVE SESSIONS ──────────────────────────────────────────────────────
//

fn read_line(prompt: &str) -> AppResult<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

async fn run_quiz(app: &AppServices, count: usize, sources: PoolSources) -> AppResult<()> {
    let quiz = app.quiz();
    let mut session = quiz.start_quiz(count, sources).await?;
    let total = session.questions().len();

    while let QuizPhase::InProgress { index } = session.phase() {
        let Some(question) = session.current_question().cloned() else {
            break;
        };
        println!();
        println!("[{}/{total}] {}", index + 1, question.prompt);
        for (n, option) in question.options.iter().enumerate() {
            println!("  {}) {option}", n + 1);
        }

        let choice = loop {
            let Some(line) = read_line("answer (q to quit): ")? else {
                return Ok(());
            };
            if line == "q" {
                return Ok(());
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=question.options.len()).contains(&n) => break n - 1,
                _ => println!("pick 1-{}", question.options.len()),
            }
        };

        let locked = session.select(&question.options[choice])?;
        if locked.correct {
            println!("correct");
        } else {
            println!("wrong, answer: {}", question.correct_answer);
        }
        if let Some(hint) = session.hint() {
            println!("  ({hint})");
        }
        quiz.advance(&mut session)?;
    }

    println!();
    println!(
        "score {}/{total}, accuracy {}%",
        session.score(),
        session.accuracy()
    );
    quiz.finish(&session).await;
    Ok(())
}

fn show_card(session: &FlashcardSession) {
    let language = match session.front() {
        CardFront::Source => "english",
        CardFront::Target => "tamil",
    };
    println!();
    println!(
        "card {}/{} [{language} first]  known {} / missed {}",
        session.position() + 1,
        session.len(),
        session.stats().correct(),
        session.stats().incorrect()
    );
    println!("  {}", session.front_text());
    if session.is_revealed() {
        println!("  {}", session.back_text());
        if let Some(hint) = session.current().transliteration() {
            println!("  ({hint})");
        }
    }
}

async fn run_cards(app: &AppServices, sources: PoolSources) -> AppResult<()> {
    let flashcards = app.flashcards();
    let mut session = flashcards.start(sources).await?;

    loop {
        show_card(&session);
        let Some(line) = read_line("[f]lip [k]new [u]nknown [n]ext [p]rev [t]oggle [r]eset [q]uit: ")?
        else {
            break;
        };
        match line.as_str() {
            "f" => session.flip(),
            "k" | "u" => {
                let record = flashcards.answer(&mut session, line == "k").await?;
                println!(
                    "  reviewed {} times ({} known)",
                    record.total_reviews(),
                    record.correct_count()
                );
            }
            "n" => session.next(),
            "p" => session.previous(),
            "t" => session.toggle_front(),
            "r" => session.reset(&mut rand::rng()),
            "q" => break,
            _ => println!("unknown key"),
        }
    }

    println!(
        "session: {} known, {} missed, accuracy {}%",
        session.stats().correct(),
        session.stats().incorrect(),
        session.stats().accuracy()
    );
    Ok(())
}

/// Create the database file and its directory so the pool can open it.
fn ensure_db_file(db_url: &str) -> AppResult<()> {
    let Some(path) = sqlite_file_path(db_url)? else {
        return Ok(());
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
