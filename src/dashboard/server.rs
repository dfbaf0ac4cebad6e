//! HTTP server implementation for the board listing.
//!
//! Form posts mutate the database and redirect back to `/`. Failures are
//! returned as structured JSON errors with a matching status code.

use axum::{
    Router,
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Json, Redirect},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::templates::{self, html_escape};
use crate::db::Database;
use crate::error::AppResult;
use crate::types::{BoardView, MoveMode, Priority};

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Database>,
    move_mode: MoveMode,
}

impl AppState {
    pub fn new(db: Arc<Database>, move_mode: MoveMode) -> Self {
        Self { db, move_mode }
    }

    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn move_mode(&self) -> MoveMode {
        self.move_mode
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Listing page: every board with its jobs and tasks, plus the edit forms.
async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let boards = state.db().board_listing()?;
    let priorities = state.db().list_priorities()?;
    let content = render_boards(&boards, &priorities);
    Ok(Html(templates::render_page(templates::PAGE_TITLE, &content)))
}

/// Form data for creating a job.
#[derive(Debug, serde::Deserialize)]
struct AddJobForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    desc: Option<String>,
}

async fn add_job(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
    Form(form): Form<AddJobForm>,
) -> AppResult<Redirect> {
    state
        .db()
        .create_job_on_board(board_id, &form.title, form.desc.as_deref())?;
    Ok(Redirect::to("/"))
}

/// Form data for creating a task.
#[derive(Debug, serde::Deserialize)]
struct AddTaskForm {
    #[serde(default)]
    title: String,
    board_id: i64,
}

async fn add_task(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Form(form): Form<AddTaskForm>,
) -> AppResult<Redirect> {
    state
        .db()
        .create_task_on_job(job_id, form.board_id, &form.title)?;
    Ok(Redirect::to("/"))
}

async fn move_task(
    State(state): State<AppState>,
    Path((task_id, board_id)): Path<(i64, i64)>,
) -> AppResult<Redirect> {
    state.db().move_task(task_id, board_id, state.move_mode())?;
    Ok(Redirect::to("/"))
}

/// Form data for completion toggles.
#[derive(Debug, serde::Deserialize)]
struct CompleteForm {
    #[serde(default)]
    complete: bool,
}

async fn complete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Form(form): Form<CompleteForm>,
) -> AppResult<Redirect> {
    state.db().set_task_complete(task_id, form.complete)?;
    Ok(Redirect::to("/"))
}

async fn complete_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Form(form): Form<CompleteForm>,
) -> AppResult<Redirect> {
    state.db().set_job_complete(job_id, form.complete)?;
    Ok(Redirect::to("/"))
}

/// Form data for changing a task's priority.
#[derive(Debug, serde::Deserialize)]
struct PriorityForm {
    #[serde(default)]
    code: String,
}

async fn set_priority(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Form(form): Form<PriorityForm>,
) -> AppResult<Redirect> {
    state.db().set_task_priority(task_id, &form.code)?;
    Ok(Redirect::to("/"))
}

/// JSON listing of boards with nested jobs and tasks.
async fn api_boards(State(state): State<AppState>) -> AppResult<Json<Vec<BoardView>>> {
    Ok(Json(state.db().board_listing()?))
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn render_boards(boards: &[BoardView], priorities: &[Priority]) -> String {
    if boards.is_empty() {
        return r#"<div class="empty-state">No boards yet. Run `kanban seed` to create the defaults.</div>"#
            .to_string();
    }

    let mut html = String::new();
    for board in boards {
        let board_id = board.board.id;
        html.push_str(&format!(
            r#"<section class="board" id="board-{board_id}"><h2>{title}</h2>"#,
            title = html_escape(&board.board.title),
        ));
        if let Some(desc) = &board.board.description {
            html.push_str(&format!(r#"<p class="board-desc">{}</p>"#, html_escape(desc)));
        }

        if board.jobs.is_empty() {
            html.push_str(r#"<div class="empty-state">No jobs</div>"#);
        }

        for job_view in &board.jobs {
            let job = &job_view.job;
            let done_class = if job.complete { " complete" } else { "" };
            html.push_str(&format!(
                r#"<article class="job" id="board-{board_id}-job-{job_id}"><h3 class="job-title{done_class}">{title}</h3>"#,
                job_id = job.id,
                title = html_escape(&job.title),
            ));
            if let Some(desc) = &job.description {
                html.push_str(&format!(r#"<p class="job-desc">{}</p>"#, html_escape(desc)));
            }
            html.push_str(&format!(
                r#"<form class="inline" method="post" action="/job/{job_id}/complete"><input type="hidden" name="complete" value="{next}"><button type="submit">{label}</button></form>"#,
                job_id = job.id,
                next = !job.complete,
                label = if job.complete { "Reopen job" } else { "Complete job" },
            ));

            html.push_str(r#"<ul class="tasks">"#);
            for task_view in &job_view.tasks {
                let task = &task_view.task;
                let task_class = if task.complete { "task complete" } else { "task" };
                html.push_str(&format!(
                    r#"<li class="{task_class}" id="task-{task_id}">{title} <span class="badge badge-{code}">{priority}</span><div class="actions">"#,
                    task_id = task.id,
                    title = html_escape(&task.title),
                    code = html_escape(&task.priority_code),
                    priority = html_escape(&task_view.priority_title),
                ));
                html.push_str(&format!(
                    r#"<form class="inline" method="post" action="/task/{task_id}/complete"><input type="hidden" name="complete" value="{next}"><button type="submit">{label}</button></form>"#,
                    task_id = task.id,
                    next = !task.complete,
                    label = if task.complete { "Reopen" } else { "Done" },
                ));
                html.push_str(&render_priority_form(task.id, &task.priority_code, priorities));
                for other in boards.iter().filter(|b| b.board.id != board_id) {
                    html.push_str(&format!(
                        r#"<form class="inline" method="post" action="/task/{task_id}/move/{to}"><button type="submit">&#8594; {title}</button></form>"#,
                        task_id = task.id,
                        to = other.board.id,
                        title = html_escape(&other.board.title),
                    ));
                }
                html.push_str("</div></li>");
            }
            html.push_str("</ul>");

            html.push_str(&format!(
                r#"<form class="add-form" method="post" action="/job/{job_id}/add_task"><input type="hidden" name="board_id" value="{board_id}"><input name="title" maxlength="40" placeholder="New task" required><button type="submit">Add task</button></form>"#,
                job_id = job.id,
            ));
            html.push_str("</article>");
        }

        html.push_str(&format!(
            r#"<form class="add-form" method="post" action="/board/{board_id}/add_job"><input name="title" maxlength="30" placeholder="New job" required><input name="desc" placeholder="Description"><button type="submit">Add job</button></form>"#,
        ));
        html.push_str("</section>");
    }
    html
}

fn render_priority_form(task_id: i64, current: &str, priorities: &[Priority]) -> String {
    let options: String = priorities
        .iter()
        .map(|p| {
            format!(
                r#"<option value="{code}"{selected}>{title}</option>"#,
                code = html_escape(&p.code),
                selected = if p.code == current { " selected" } else { "" },
                title = html_escape(&p.title),
            )
        })
        .collect();
    format!(
        r#"<form class="inline" method="post" action="/task/{task_id}/priority"><select name="code">{options}</select><button type="submit">Set</button></form>"#
    )
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Page routes
        .route("/", get(index))
        // Form routes
        .route("/board/{board_id}/add_job", post(add_job))
        .route("/job/{job_id}/add_task", post(add_task))
        .route("/job/{job_id}/complete", post(complete_job))
        .route("/task/{task_id}/move/{board_id}", post(move_task))
        .route("/task/{task_id}/complete", post(complete_task))
        .route("/task/{task_id}/priority", post(set_priority))
        // API routes
        .route("/api/boards", get(api_boards))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle for a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal graceful shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Bind `addr` and serve the router in a background task.
pub async fn start_server(state: AppState, addr: &str) -> anyhow::Result<ServerHandle> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Kanban server listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Kanban server shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr: bound_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Board, Job, JobView, Task, TaskView};

    fn sample_listing() -> Vec<BoardView> {
        vec![
            BoardView {
                board: Board {
                    id: 1,
                    title: "To Do".to_string(),
                    description: Some("Things to do".to_string()),
                },
                jobs: vec![JobView {
                    board_job_id: 1,
                    job: Job {
                        id: 5,
                        title: "Draft <proposal>".to_string(),
                        description: None,
                        complete: false,
                    },
                    tasks: vec![TaskView {
                        task: Task {
                            id: 9,
                            title: "Write tests".to_string(),
                            complete: true,
                            priority_code: "urg".to_string(),
                            job_id: 5,
                        },
                        priority_title: "Urgent".to_string(),
                    }],
                }],
            },
            BoardView {
                board: Board {
                    id: 2,
                    title: "Doing".to_string(),
                    description: None,
                },
                jobs: vec![],
            },
        ]
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy",
            version: "0.1.0",
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }

    #[test]
    fn render_boards_escapes_and_links_moves() {
        let priorities = vec![
            Priority {
                code: "none".to_string(),
                title: "None".to_string(),
            },
            Priority {
                code: "urg".to_string(),
                title: "Urgent".to_string(),
            },
        ];
        let html = render_boards(&sample_listing(), &priorities);

        assert!(html.contains("Draft &lt;proposal&gt;"));
        assert!(html.contains(r#"action="/task/9/move/2""#));
        assert!(!html.contains(r#"action="/task/9/move/1""#));
        assert!(html.contains(r#"<option value="urg" selected>Urgent</option>"#));
        assert!(html.contains(r#"class="task complete""#));
        assert!(html.contains(r#"action="/board/2/add_job""#));
        assert!(html.contains(r#"name="board_id" value="1""#));
    }

    #[tokio::test]
    async fn start_server_serves_health_until_shutdown() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let db = Arc::new(Database::open_in_memory().unwrap());
        let handle = start_server(AppState::new(db, MoveMode::Replace), "127.0.0.1:0")
            .await
            .unwrap();
        let addr = handle.local_addr();
        assert_ne!(addr.port(), 0);

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("\"status\":\"healthy\""));

        handle.shutdown().await;
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }

    #[test]
    fn render_boards_empty_state() {
        let html = render_boards(&[], &[]);
        assert!(html.contains("No boards yet"));
    }
}
