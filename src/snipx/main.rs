use clap::Parser;
use directories::ProjectDirs;
use snipx::api::{ConfigAction, ListFilter, SnipxApi, SortSpec};
use snipx::config::SnipxConfig;
use snipx::error::{Result, SnipxError};
use snipx::model::CategoryDeletePolicy;
use snipx::store::{FsBackend, SnippetStore};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

mod args;
mod print;
use args::{CategoryCommands, Cli, Commands, DraftCommands};
use print::{
    print_categories, print_execution, print_full_snippets, print_messages, print_modes,
    print_snippets,
};

const DATA_DIR_ENV: &str = "SNIPX_DATA_DIR";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

type Api = SnipxApi<FsBackend>;

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut api = init_api()?;

    match cli.command {
        Some(Commands::Add {
            name,
            code,
            mode,
            category,
            file,
        }) => {
            let code = read_code(code, file)?;
            let result = api.add_snippet(&name, &code, mode.as_deref(), category.as_deref())?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::List {
            sort,
            search,
            category,
            mode,
        }) => handle_list(&api, sort, search, category, mode),
        Some(Commands::Show { snippets }) => {
            let result = api.view_snippets(&snippets)?;
            print_full_snippets(&result.listed_snippets);
            Ok(())
        }
        Some(Commands::Rename { snippet, new_name }) => {
            let result = api.rename_snippet(&snippet, &new_name)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Edit {
            snippet,
            code,
            file,
        }) => {
            let code = read_code(code, file)?;
            let result = api.set_snippet_code(&snippet, &code)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Mode { snippet, mode }) => {
            let result = api.set_snippet_mode(&snippet, &mode)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Category(cmd)) => handle_category(&mut api, cmd),
        Some(Commands::Pin { snippets }) => {
            let result = api.pin_snippets(&snippets)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Unpin { snippets }) => {
            let result = api.unpin_snippets(&snippets)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Delete { snippets }) => {
            let result = api.delete_snippets(&snippets)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Duplicate { snippets }) => {
            let result = api.duplicate_snippets(&snippets)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Run { snippet }) => {
            let result = api.run_snippet(&snippet)?;
            finish_run(&result)
        }
        Some(Commands::Draft(cmd)) => handle_draft(&mut api, cmd),
        Some(Commands::Import {
            paths,
            mode,
            category,
        }) => {
            let result = api.import_files(&paths, mode.as_deref(), category.as_deref())?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Export { snippets, output }) => handle_export(&api, snippets, output),
        Some(Commands::Paste { file }) => {
            let json = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => read_stdin()?,
            };
            let result = api.paste_snippets(&json)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Modes) => {
            let result = api.list_modes()?;
            print_modes(&result.modes);
            Ok(())
        }
        Some(Commands::Resolve { snippet }) => {
            let result = api.resolve_snippet(&snippet)?;
            print_messages(&result.messages);
            if let Some(code) = &result.resolved_code {
                println!("{}", code);
            }
            Ok(())
        }
        Some(Commands::Config { key, value }) => {
            let action = match (key, value) {
                (None, _) => ConfigAction::ShowAll,
                (Some(key), None) => ConfigAction::ShowKey(key),
                (Some(key), Some(value)) => ConfigAction::Set(key, value),
            };
            let result = api.configure(action)?;
            print_messages(&result.messages);
            Ok(())
        }
        None => handle_list(&api, None, None, None, None),
    }
}

/// `warn` by default, `-v` for info, `-vv` for debug. `RUST_LOG` wins.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "snipx", "snipx")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SnipxError::Store("Could not determine data dir".to_string()))
}

fn init_api() -> Result<Api> {
    let dir = data_dir()?;
    log::debug!("Using data dir {}", dir.display());
    let config = SnipxConfig::load(&dir)?;
    let store = SnippetStore::with_backend(FsBackend::new(dir.clone()))?;
    Ok(SnipxApi::new(store, config).with_config_dir(dir))
}

fn handle_list(
    api: &Api,
    sort: Option<String>,
    search: Option<String>,
    category: Option<String>,
    mode: Option<String>,
) -> Result<()> {
    let sort = sort.as_deref().map(SortSpec::parse).transpose()?;
    let filter = ListFilter {
        search,
        category,
        mode,
    };
    let result = api.list_snippets(&filter, sort)?;
    print_snippets(&result.listed_snippets);
    print_messages(&result.messages);
    Ok(())
}

fn handle_category(api: &mut Api, cmd: CategoryCommands) -> Result<()> {
    let result = match cmd {
        CategoryCommands::List => {
            let result = api.list_categories()?;
            print_categories(&result.categories);
            result
        }
        CategoryCommands::Add { name } => api.add_category(&name)?,
        CategoryCommands::Rename { old, new } => api.rename_category(&old, &new)?,
        CategoryCommands::Delete {
            name,
            with_snippets,
        } => {
            let policy = if with_snippets {
                CategoryDeletePolicy::DeleteMembers
            } else {
                CategoryDeletePolicy::ClearMembers
            };
            api.delete_category(&name, policy)?
        }
        CategoryCommands::Set { snippet, category } => {
            api.set_snippet_category(&snippet, Some(&category))?
        }
        CategoryCommands::Clear { snippet } => api.set_snippet_category(&snippet, None)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_draft(api: &mut Api, cmd: DraftCommands) -> Result<()> {
    match cmd {
        DraftCommands::Show => {
            let result = api.show_draft()?;
            print_messages(&result.messages);
            if let Some(code) = &result.resolved_code {
                println!("{}", code);
            }
            Ok(())
        }
        DraftCommands::Set { code, file } => {
            let code = read_code(code, file)?;
            let result = api.set_draft_code(&code)?;
            print_messages(&result.messages);
            Ok(())
        }
        DraftCommands::Mode { mode } => {
            let result = api.set_draft_mode(&mode)?;
            print_messages(&result.messages);
            Ok(())
        }
        DraftCommands::Run => {
            let result = api.run_draft()?;
            finish_run(&result)
        }
        DraftCommands::Save { name, category } => {
            let result = api.save_draft(&name, category.as_deref())?;
            print_messages(&result.messages);
            Ok(())
        }
    }
}

fn handle_export(api: &Api, snippets: Vec<String>, output: Option<PathBuf>) -> Result<()> {
    let result = api.export_snippets(&snippets)?;
    let json = result.exported.clone().unwrap_or_default();
    match output {
        Some(path) => {
            write_file(&path, &json)?;
            print_messages(&result.messages);
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Print results and messages; a failed run becomes the process error.
fn finish_run(result: &snipx::api::CmdResult) -> Result<()> {
    if let Some(execution) = &result.execution {
        print_execution(execution);
    }
    let errors = result.has_errors();
    print_messages(&result.messages);
    if errors {
        return Err(SnipxError::Api("Execution failed".to_string()));
    }
    Ok(())
}

fn read_code(code: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(code) = code {
        return Ok(code);
    }
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if std::io::stdin().is_terminal() {
        return Ok(String::new());
    }
    read_stdin()
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}
