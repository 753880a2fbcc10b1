//! Subcommand handlers. Each builds the matching view, loads it and prints
//! the published state.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use athletics_core::api::ApiClient;
use athletics_core::auth::{CredentialStore, Session};
use athletics_core::cache::FetchState;
use athletics_core::config::{Config, MAX_PER_PAGE};
use athletics_core::models::{
    AthletePage, AthleteSortField, CompetitionAthletePage, CompetitionPage, CompetitionResults,
    DatabaseStats, NationalDashboard, Pagination, ResultRow, SortOrder,
};
use athletics_core::utils::{format_count, format_date, format_optional};
use athletics_core::views::{
    AthleteListView, AthleteResultsView, AthleteSearchView, AthleteTarget, CompetitionDetailView,
    CompetitionListView, DashboardView, NationalDashboardView, ReferenceView, ResultsPage,
    ViewContext,
};

use crate::output::{report, Table};

// ===== Session =====

pub async fn login(api: &ApiClient, config: &mut Config, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => prompt_username(config.last_username.as_deref())?,
    };
    if username.is_empty() {
        bail!("Username required");
    }

    let credentials = CredentialStore::new(api.base_url());
    let password = if credentials.has_credentials(&username) && confirm_stored_password()? {
        credentials.get_password(&username)?
    } else {
        rpassword::prompt_password("Password: ")?
    };

    println!("Authenticating...");
    let session_data = api
        .authenticate(&username, &password)
        .await
        .context("Login failed")?;

    if let Err(e) = credentials.store(&username, &password) {
        warn!(error = %e, "Failed to store credentials");
    }

    config.last_username = Some(username.clone());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let mut session = Session::new(config.cache_dir()?);
    session.update(session_data);
    session.save().context("Failed to save session")?;

    info!(username = %username, "Login successful");
    println!("Logged in as {}", username);
    Ok(())
}

pub fn logout(config: &Config) -> Result<()> {
    let mut session = Session::new(config.cache_dir()?);
    // An unreadable session file is cleared all the same
    let _ = session.load();
    let username = session
        .username()
        .map(str::to_string)
        .or_else(|| config.last_username.clone());
    session.clear()?;

    if let Some(username) = username {
        let credentials = CredentialStore::new(&config.api_base_url());
        if let Err(e) = credentials.delete(&username) {
            warn!(error = %e, "Failed to delete stored credential");
        }
    }
    println!("Logged out");
    Ok(())
}

fn prompt_username(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Username [{}]: ", last),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    Ok(match (input.is_empty(), last) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

fn confirm_stored_password() -> Result<bool> {
    print!("Use stored password? [Y/n]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase() != "n")
}

/// The client with a token from `--token` or the saved session.
pub fn authed_client(api: &ApiClient, token: Option<&str>, config: &Config) -> Result<ApiClient> {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        return Ok(api.with_token(token.trim()));
    }

    let mut session = Session::new(config.cache_dir()?);
    if !session.load()? {
        bail!("Not logged in or session expired. Run `athletics login` first.");
    }
    match session.token() {
        Some(token) => Ok(api.with_token(token)),
        None => bail!("Not logged in. Run `athletics login` first."),
    }
}

// ===== Dashboard =====

pub async fn health(api: &ApiClient) -> Result<()> {
    let health = api.health().await?;
    println!(
        "status: {}  database: {}",
        health.status,
        format_optional(&health.database, "unknown")
    );
    if let Some(ref error) = health.error {
        println!("error: {}", error);
    }
    if !health.is_healthy() {
        bail!("service is unhealthy");
    }
    Ok(())
}

pub async fn stats(ctx: &ViewContext, watch: Option<u64>) -> Result<()> {
    let view = DashboardView::new(ctx);
    let Some(secs) = watch else {
        return report(&view.load().await, print_stats);
    };

    // Keep polling through failures; stale data stays on screen
    loop {
        if let Err(e) = report(&view.load().await, print_stats) {
            eprintln!("error: {:#}", e);
        }
        tokio::time::sleep(Duration::from_secs(secs.max(1))).await;
        println!();
    }
}

fn print_stats(stats: &DatabaseStats) {
    println!("Competitions  {:>10}", format_count(stats.competitions));
    println!("Athletes      {:>10}", format_count(stats.athletes));
    println!("Results       {:>10}", format_count(stats.results));
    println!("Events        {:>10}", format_count(stats.events));
}

// ===== Competitions =====

pub async fn competitions(
    ctx: &ViewContext,
    search: Option<&str>,
    page: u32,
    per_page: Option<u32>,
) -> Result<()> {
    let ctx = match per_page {
        Some(n) => ctx.clone().with_per_page(n.clamp(1, MAX_PER_PAGE)),
        None => ctx.clone(),
    };
    let mut view = CompetitionListView::new(&ctx).with_search(search.unwrap_or_default());
    let state = view.go_to_page(page).await;
    report(&state, print_competitions)
}

fn print_competitions(page: &CompetitionPage) {
    let mut table = Table::new(&[
        ("ID", 6),
        ("Name", 40),
        ("Dates", 28),
        ("Country", 16),
        ("Results", 7),
    ]);
    for c in &page.competitions {
        table.row(vec![
            c.id.to_string(),
            c.name.clone(),
            c.date_range(),
            c.country_display().to_string(),
            c.result_count.map(format_count).unwrap_or_default(),
        ]);
    }
    table.print("No competitions found");
    print_pagination(&page.pagination);
}

pub async fn competition(ctx: &ViewContext, id: i64, page: u32, athletes: bool) -> Result<()> {
    let mut view = CompetitionDetailView::new(ctx, id);
    if athletes {
        let state = view.athletes_go_to_page(page).await;
        report(&state, print_competition_athletes)
    } else {
        let state = view.results_go_to_page(page).await;
        report(&state, print_competition_results)
    }
}

fn print_competition_results(results: &CompetitionResults) {
    print_result_rows(&results.results, true);
    print_pagination(&results.pagination());
}

fn print_competition_athletes(page: &CompetitionAthletePage) {
    let mut table = Table::new(&[
        ("ID", 8),
        ("Name", 30),
        ("Country", 16),
        ("Events", 6),
        ("Results", 7),
        ("Best", 4),
    ]);
    for a in &page.athletes {
        let id = if a.is_registered() {
            a.id.to_string()
        } else {
            "-".to_string()
        };
        table.row(vec![
            id,
            a.full_name.clone(),
            a.country_name
                .clone()
                .or_else(|| a.country_code.clone())
                .unwrap_or_default(),
            a.events_participated.to_string(),
            a.result_count.to_string(),
            a.best_place.map(|p| p.to_string()).unwrap_or_default(),
        ]);
    }
    table.print("No athletes found");
    print_pagination(&page.pagination);
}

// ===== Athletes =====

pub async fn athletes(
    ctx: &ViewContext,
    search: Option<&str>,
    page: u32,
    sort_by: &str,
    order: &str,
) -> Result<()> {
    let mut view = AthleteListView::new(ctx)
        .with_search(search.unwrap_or_default())
        .with_sort(AthleteSortField::parse(sort_by), SortOrder::parse(order));
    let state = view.go_to_page(page).await;
    report(&state, print_athletes)
}

fn print_athletes(page: &AthletePage) {
    let mut table = Table::new(&[
        ("ID", 8),
        ("Name", 30),
        ("Country", 16),
        ("Gender", 6),
        ("Born", 12),
    ]);
    for a in &page.athletes {
        table.row(vec![
            a.id.to_string(),
            a.full_name.clone(),
            a.country_display().to_string(),
            a.gender_display().to_string(),
            a.birth_date.as_deref().map(format_date).unwrap_or_default(),
        ]);
    }
    table.print("No athletes found");
    print_pagination(&page.pagination);
}

pub async fn athlete_results(ctx: &ViewContext, target: AthleteTarget, page: u32) -> Result<()> {
    let mut view = AthleteResultsView::new(ctx, target);
    let state = view.go_to_page(page).await;
    report(&state, print_results_page)
}

fn print_results_page(page: &ResultsPage) {
    println!("{}", page.title);
    println!();
    print_result_rows(&page.results, false);
    print_pagination(&page.pagination);
}

pub async fn suggest(ctx: &ViewContext, query: &str, limit: u32) -> Result<()> {
    let mut view = AthleteSearchView::new(ctx).with_limit(limit);
    let state = view.search(query).await;
    report(&state, |suggestions| {
        let mut table = Table::new(&[("ID", 8), ("Name", 30), ("Country", 16)]);
        for s in suggestions {
            table.row(vec![
                s.id.to_string(),
                s.full_name.clone(),
                s.country_name
                    .clone()
                    .or_else(|| s.country_code.clone())
                    .unwrap_or_default(),
            ]);
        }
        table.print("No athletes");
    })
}

// ===== Reference =====

pub async fn disciplines(ctx: &ViewContext) -> Result<()> {
    let view = ReferenceView::new(ctx);
    report(&view.load_disciplines().await, |disciplines| {
        let mut table = Table::new(&[("Code", 8), ("Name", 32), ("Category", 20)]);
        for d in disciplines {
            table.row(vec![
                d.discipline_code.clone(),
                d.discipline_name.clone(),
                format_optional(&d.category, ""),
            ]);
        }
        table.print("No disciplines");
    })
}

pub async fn countries(ctx: &ViewContext) -> Result<()> {
    let view = ReferenceView::new(ctx);
    report(&view.load_countries().await, |countries| {
        let mut table = Table::new(&[("Code", 6), ("Name", 40)]);
        for c in countries {
            table.row(vec![c.code.clone(), c.name.clone()]);
        }
        table.print("No countries");
    })
}

// ===== National =====

pub async fn national(ctx: &ViewContext, watch: Option<u64>) -> Result<()> {
    let view = NationalDashboardView::new(ctx);
    let Some(secs) = watch else {
        return report(&view.load().await, print_national);
    };

    loop {
        let state: FetchState<NationalDashboard> = view.load().await;
        if let Err(e) = report(&state, print_national) {
            eprintln!("error: {:#}", e);
        }
        tokio::time::sleep(Duration::from_secs(secs.max(1))).await;
        println!();
    }
}

fn print_national(dashboard: &NationalDashboard) {
    let summary = &dashboard.summary;
    println!(
        "Athletes {} ({} with results, {:.1}%)  Competitions {}  Results {}",
        format_count(summary.total_athletes),
        format_count(summary.athletes_with_results),
        summary.active_share(),
        format_count(summary.total_competitions),
        format_count(summary.total_results),
    );
    for g in &summary.gender_distribution {
        println!("  {}: {}", g.gender_category, format_count(g.count));
    }

    println!("\nTop athletes");
    let mut top = Table::new(&[("Name", 30), ("Country", 8), ("Results", 8), ("Meets", 6)]);
    for a in &dashboard.top_athletes {
        top.row(vec![
            a.full_name.clone(),
            format_optional(&a.country_code, ""),
            a.result_count.to_string(),
            a.competition_count.to_string(),
        ]);
    }
    top.print("  none");

    println!("\nDisciplines");
    let mut disciplines = Table::new(&[
        ("Name", 30),
        ("Category", 16),
        ("Athletes", 8),
        ("Results", 8),
    ]);
    for d in &dashboard.disciplines {
        disciplines.row(vec![
            d.discipline_name.clone(),
            format_optional(&d.category, ""),
            d.athlete_count.to_string(),
            d.result_count.to_string(),
        ]);
    }
    disciplines.print("  none");

    println!("\nBy year");
    let mut timeline = Table::new(&[("Year", 6), ("Meets", 6), ("Races", 6), ("Results", 8)]);
    for y in &dashboard.timeline {
        timeline.row(vec![
            y.year.to_string(),
            y.competition_count.to_string(),
            y.race_count.to_string(),
            y.result_count.to_string(),
        ]);
    }
    timeline.print("  none");

    println!("\nRegion");
    let mut regional = Table::new(&[("Country", 24), ("Athletes", 8), ("Results", 8)]);
    for r in &dashboard.regional {
        let country = r
            .country_name
            .clone()
            .or_else(|| r.country_code.clone())
            .unwrap_or_default();
        regional.row(vec![
            country,
            r.athlete_count.to_string(),
            r.result_count.to_string(),
        ]);
    }
    regional.print("  none");
}

// ===== Shared =====

fn print_result_rows(rows: &[ResultRow], with_athlete: bool) {
    let mut table = if with_athlete {
        Table::new(&[
            ("Discipline", 20),
            ("Athlete", 26),
            ("Country", 7),
            ("Mark", 10),
            ("Place", 5),
            ("Date", 12),
        ])
    } else {
        Table::new(&[
            ("Discipline", 20),
            ("Competition", 30),
            ("Mark", 10),
            ("Place", 5),
            ("Date", 12),
        ])
    };
    for r in rows {
        let date = r.race_date.as_deref().map(format_date).unwrap_or_default();
        let cells = if with_athlete {
            vec![
                r.discipline_display().to_string(),
                format_optional(&r.athlete_name, ""),
                format_optional(&r.athlete_country, ""),
                r.mark_display(),
                r.place_display(),
                date,
            ]
        } else {
            vec![
                r.discipline_display().to_string(),
                format_optional(&r.competition_name, ""),
                r.mark_display(),
                r.place_display(),
                date,
            ]
        };
        table.row(cells);
    }
    table.print("No results");
}

fn print_pagination(pagination: &Pagination) {
    println!("\n{}", pagination.summary());
}
