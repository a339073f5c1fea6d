use anyhow::Result;
use foliobase::tools::ToolRegistry;
use tempfile::TempDir;

#[test]
fn builtin_tools_register_under_slug_names() -> Result<()> {
    let dir = TempDir::new()?;
    let tools = ToolRegistry::with_builtin_tools(dir.path());
    assert_eq!(tools.names(), vec!["calculator", "note-taking"]);
    assert!(tools.get("Note Taking").is_some(), "lookups normalize too");
    assert!(tools.execute("nonsense", "").is_err());
    Ok(())
}

#[test]
fn notes_survive_a_save_get_delete_cycle() -> Result<()> {
    let dir = TempDir::new()?;
    let tools = ToolRegistry::with_builtin_tools(dir.path());

    let saved = tools.execute("note-taking", "SAVE:Standup|Discuss the roadmap and blockers")?;
    assert_eq!(saved, "Saved note 'Standup'.");

    let listed = tools.execute("note-taking", "LIST")?;
    assert!(listed.contains("Standup"));

    let fetched = tools.execute("note-taking", "GET:Standup")?;
    assert!(fetched.contains("Discuss the roadmap and blockers"));

    let deleted = tools.execute("note-taking", "DELETE:Standup")?;
    assert_eq!(deleted, "Deleted note 'Standup'.");
    assert_eq!(tools.execute("note-taking", "LIST")?, "No notes saved yet.");
    Ok(())
}

#[test]
fn modelfiles_render_for_every_tool() -> Result<()> {
    let dir = TempDir::new()?;
    let tools = ToolRegistry::with_builtin_tools(dir.path().join("notes"));

    let modelfile = tools
        .modelfile("calculator")
        .expect("calculator should render a Modelfile");
    assert!(modelfile.starts_with("FROM llama3.2:3b"));
    assert!(modelfile.contains("SYSTEM \"\"\""));

    let out_dir = dir.path().join("modelfiles");
    let written = tools.write_modelfiles(&out_dir)?;
    assert_eq!(written.len(), 2);
    assert!(out_dir.join("Modelfile.calculator").exists());
    assert!(out_dir.join("Modelfile.note-taking").exists());
    Ok(())
}
