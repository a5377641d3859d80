use carrel::config::CarrelConfig;
use carrel::error::{CarrelError, Result};
use carrel::import;
use carrel::library::Library;
use carrel::model::{Category, Item, Priority, Task};
use carrel::store::fs::FileStore;
use carrel::store::SnapshotStore;
use chrono::{Duration, Utc};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::collections::HashMap;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

mod args;
use args::{Cli, Commands, TaskCommands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    library: Library,
    store: FileStore,
    config: CarrelConfig,
}

impl AppContext {
    /// Rotate a backup of the previous state, then persist the current one.
    fn persist(&mut self) -> Result<()> {
        self.store.backup()?;
        self.store.save(&self.library.create_snapshot())
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add {
            title,
            category,
            path,
            url,
            tag,
            rating,
        }) => handle_add(&mut ctx, title, category, path, url, tag, rating),
        Some(Commands::List) => handle_list(&ctx),
        Some(Commands::Search { terms }) => handle_search(&ctx, terms),
        Some(Commands::Show { number }) => handle_show(&mut ctx, number),
        Some(Commands::Edit {
            number,
            title,
            category,
            path,
            url,
            rating,
            add_tags,
            remove_tags,
        }) => handle_edit(
            &mut ctx,
            number,
            EditRequest {
                title,
                category,
                path,
                url,
                rating,
                add_tags,
                remove_tags,
            },
        ),
        Some(Commands::Delete { number }) => handle_delete(&mut ctx, number),
        Some(Commands::Undo) => handle_undo(&mut ctx),
        Some(Commands::Recent) => handle_recent(&ctx),
        Some(Commands::Back { number }) => handle_back(&mut ctx, number),
        Some(Commands::Tags) => handle_tags(&ctx),
        Some(Commands::Task { command }) => handle_task(&mut ctx, command),
        Some(Commands::Import { dir }) => handle_import(&mut ctx, dir),
        None => handle_list(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let dir = data_dir(cli);
    let config = CarrelConfig::load(&dir).unwrap_or_default();

    let store = FileStore::new(dir).with_backup_keep(config.backup_keep);
    let mut library = Library::with_recent_limit(config.recent_limit);
    if let Some(snapshot) = store.load()? {
        library.restore_snapshot(snapshot);
    }

    Ok(AppContext {
        library,
        store,
        config,
    })
}

fn data_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.data_dir {
        return dir.clone();
    }
    if let Ok(dir) = std::env::var("CARREL_HOME") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    let proj_dirs =
        ProjectDirs::from("com", "carrel", "carrel").expect("Could not determine data dir");
    proj_dirs.data_dir().to_path_buf()
}

struct EditRequest {
    title: Option<String>,
    category: Option<String>,
    path: Option<String>,
    url: Option<String>,
    rating: Option<u8>,
    add_tags: Vec<String>,
    remove_tags: Vec<String>,
}

impl EditRequest {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.path.is_none()
            && self.url.is_none()
            && self.rating.is_none()
            && self.add_tags.is_empty()
            && self.remove_tags.is_empty()
    }
}

fn handle_add(
    ctx: &mut AppContext,
    title: String,
    category: String,
    path: Option<String>,
    url: Option<String>,
    tags: Vec<String>,
    rating: Option<u8>,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CarrelError::Api("Title cannot be empty".into()));
    }
    let category: Category = category.parse().map_err(CarrelError::Api)?;

    let mut item = Item::new(title, category, path);
    for tag in &tags {
        item.add_tag(tag);
    }
    if let Some(rating) = rating {
        item.set_rating(rating);
    }
    if let Some(url) = url {
        item.set_media_url(Some(url));
    }

    let title = item.title().to_string();
    ctx.library.add_item(item)?;
    ctx.persist()?;
    println!("{}", format!("Added: {}", title).green());
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    print_items(&ctx.library, &ctx.library.items());
    Ok(())
}

fn handle_search(ctx: &AppContext, terms: Vec<String>) -> Result<()> {
    let query = terms.join(" ");
    let results = ctx.library.search(&query);
    if results.is_empty() {
        println!("No matches for \"{}\".", query);
        return Ok(());
    }
    print_items(&ctx.library, &results);
    Ok(())
}

fn handle_show(ctx: &mut AppContext, number: usize) -> Result<()> {
    let item = item_at(&ctx.library, number)?;
    ctx.library.mark_viewed(item.id());
    ctx.persist()?;

    println!("{}", item.title().bold());
    println!("  category  {}", item.category());
    println!("  rating    {}", "★".repeat(item.rating() as usize));
    if !item.tags().is_empty() {
        let tags: Vec<&str> = item.tags().iter().map(String::as_str).collect();
        println!("  tags      {}", tags.join(", "));
    }
    if let Some(path) = item.file_path() {
        println!("  file      {} ({:?})", path, item.file_kind());
    }
    if let Some(url) = item.media_url() {
        println!("  media     {}", url);
    }
    println!("  added     {}", format_time_ago(item.created_at()).trim());
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, number: usize, request: EditRequest) -> Result<()> {
    if request.is_empty() {
        println!("{}", "Nothing to change.".dimmed());
        return Ok(());
    }
    let category = match &request.category {
        Some(raw) => Some(raw.parse::<Category>().map_err(CarrelError::Api)?),
        None => None,
    };

    let item = item_at(&ctx.library, number)?;
    ctx.library.edit_item(item.id(), |it| {
        if let Some(title) = request.title {
            it.set_title(title);
        }
        if let Some(category) = category {
            it.set_category(category);
        }
        if let Some(path) = request.path {
            it.set_file_path(Some(path));
        }
        if let Some(url) = request.url {
            it.set_media_url(Some(url));
        }
        if let Some(rating) = request.rating {
            it.set_rating(rating);
        }
        for tag in &request.add_tags {
            it.add_tag(tag);
        }
        for tag in &request.remove_tags {
            it.remove_tag(tag);
        }
    })?;
    ctx.persist()?;

    let updated = ctx
        .library
        .item(item.id())
        .ok_or_else(|| CarrelError::Api("Item vanished during edit".into()))?;
    println!("{}", format!("Updated: {}", updated.title()).green());
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, number: usize) -> Result<()> {
    let item = item_at(&ctx.library, number)?;
    if ctx.library.delete_item(item.id()) {
        ctx.persist()?;
        println!("{}", format!("Deleted: {}", item.title()).green());
    } else {
        println!("{}", "Item already gone.".yellow());
    }
    Ok(())
}

fn handle_undo(ctx: &mut AppContext) -> Result<()> {
    if ctx.library.undo() {
        ctx.persist()?;
        println!("{}", "Undo successful".green());
    } else {
        println!("{}", "Nothing to undo".dimmed());
    }
    Ok(())
}

fn handle_recent(ctx: &AppContext) -> Result<()> {
    let recent = ctx.library.recently_viewed();
    if recent.is_empty() {
        println!("No views recorded yet.");
        return Ok(());
    }
    print_items(&ctx.library, &recent);
    Ok(())
}

fn handle_back(ctx: &mut AppContext, number: usize) -> Result<()> {
    let current = item_at(&ctx.library, number)?;
    match ctx.library.navigate_back(current.id()) {
        Some(previous) => {
            ctx.persist()?;
            println!("Previously viewed: {}", previous.title().bold());
        }
        None => println!("{}", "No earlier view.".dimmed()),
    }
    Ok(())
}

fn handle_tags(ctx: &AppContext) -> Result<()> {
    let mut counts: Vec<(String, u32)> = ctx.library.tag_frequency().into_iter().collect();
    if counts.is_empty() {
        println!("No tags yet.");
        return Ok(());
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (tag, count) in counts {
        println!("{:>4}  {}", count, tag);
    }
    Ok(())
}

fn handle_task(ctx: &mut AppContext, command: TaskCommands) -> Result<()> {
    match command {
        TaskCommands::Add {
            item,
            description,
            due_in,
            priority,
        } => {
            let priority: Priority = priority.parse().map_err(CarrelError::Api)?;
            let owner = item_at(&ctx.library, item)?;
            let deadline = Utc::now() + Duration::hours(due_in);
            ctx.library
                .add_task(Task::new(owner.id(), description.clone(), deadline, priority));
            ctx.persist()?;
            println!(
                "{}",
                format!("Task added for {}: {}", owner.title(), description).green()
            );
        }
        TaskCommands::Done { number } => {
            let task = task_at(&ctx.library, number)?;
            if ctx.library.complete_task(task.id()) {
                ctx.persist()?;
                println!("{}", format!("Completed: {}", task.description()).green());
            } else {
                println!("{}", "Task already gone.".yellow());
            }
        }
        TaskCommands::List => print_tasks(&ctx.library),
        TaskCommands::Next => match ctx.library.peek_next_task() {
            Some(task) => println!(
                "Next up: {} ({}, {})",
                task.description().bold(),
                task.priority(),
                format_due(&task)
            ),
            None => println!("No tasks."),
        },
    }
    Ok(())
}

fn handle_import(ctx: &mut AppContext, dir: PathBuf) -> Result<()> {
    let extensions = ctx.config.import_extensions.clone();
    let report = import::import_directory(&mut ctx.library, &dir, &extensions);
    if report.imported > 0 {
        ctx.persist()?;
    }
    for error in &report.errors {
        println!("{}", error.yellow());
    }
    println!(
        "{}",
        format!(
            "Imported: {}, Skipped: {}",
            report.imported, report.skipped
        )
        .green()
    );
    Ok(())
}

/// Items are addressed by their 1-based position in the title-sorted
/// listing, which is stable between runs.
fn item_at(library: &Library, number: usize) -> Result<Item> {
    number
        .checked_sub(1)
        .and_then(|idx| library.items().into_iter().nth(idx))
        .ok_or_else(|| CarrelError::Api(format!("No item number {}", number)))
}

fn task_at(library: &Library, number: usize) -> Result<Task> {
    number
        .checked_sub(1)
        .and_then(|idx| library.tasks_by_urgency().into_iter().nth(idx))
        .ok_or_else(|| CarrelError::Api(format!("No task number {}", number)))
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

fn print_items(library: &Library, items: &[Item]) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }

    // Numbers always come from the canonical title-sorted listing so a
    // search result line can be fed straight back into show/edit/delete.
    let numbers: HashMap<Uuid, usize> = library
        .items()
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.id(), idx + 1))
        .collect();

    for item in items {
        let number = numbers.get(&item.id()).copied().unwrap_or(0);
        let idx_str = format!("{}. ", number);

        let mut detail = format!("{} [{}]", item.title(), item.category());
        if !item.tags().is_empty() {
            let tags: Vec<String> = item.tags().iter().map(|t| format!("#{}", t)).collect();
            detail.push(' ');
            detail.push_str(&tags.join(" "));
        }

        let time_ago = format_time_ago(item.created_at());
        let available = LINE_WIDTH.saturating_sub(idx_str.width() + TIME_WIDTH + 2);
        let detail = truncate_to_width(&detail, available);
        let padding = available.saturating_sub(detail.width());

        println!(
            "{}{}{}  {}",
            idx_str,
            detail,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

fn print_tasks(library: &Library) {
    let tasks = library.tasks_by_urgency();
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }

    let titles: HashMap<Uuid, String> = library
        .items()
        .iter()
        .map(|item| (item.id(), item.title().to_string()))
        .collect();

    for (idx, task) in tasks.iter().enumerate() {
        let owner = titles
            .get(&task.item_id())
            .map(String::as_str)
            .unwrap_or("?");
        let due = if task.is_overdue() {
            format_due(task).red().to_string()
        } else {
            format_due(task).normal().to_string()
        };
        println!(
            "{}. {} - {} ({}, {})",
            idx + 1,
            task.description().bold(),
            owner,
            task.priority(),
            due
        );
    }
}

fn format_due(task: &Task) -> String {
    let hours = task
        .deadline()
        .signed_duration_since(Utc::now())
        .num_hours();
    if hours < 0 {
        "overdue".to_string()
    } else if hours < 24 {
        format!("due in {}h", hours.max(1))
    } else {
        format!("due in {}d", hours / 24)
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
