//! Persisted cells across two "application runs" sharing one state file.

use shared_state::{AppState, FileStore, Format, KeyValueStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Persisted Cells Example ===\n");

    let dir = std::env::temp_dir().join("shared-state-demo");
    let path = dir.join(".previous.dat");
    let _ = std::fs::remove_file(&path);

    // First run: defaults are seeded, then edited
    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).await?);
        let state = AppState::open(store).await?;

        let _guard = state.input_format().subscribe(|format| {
            println!("Input format is now {format}");
        });

        state.input_format().set(Format::Yaml.to_string());
        state.input_text().set("cool_app: true".to_string());
        println!("Converted:\n{}", state.convert()?);

        println!("\nClosing (sync + save)...");
        state.close().await?;
    }

    // Second run: edited values come back, output text does not
    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).await?);
        let state = AppState::open(store).await?;

        println!("\nRestored input format: {}", state.input_format().get());
        println!("Restored input text:   {}", state.input_text().get());
        println!("Output text:           {:?}", state.output_text().get());
    }

    println!("\nState file: {}", path.display());
    println!("{}", std::fs::read_to_string(&path)?);
    Ok(())
}
