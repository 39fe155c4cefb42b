use tauri::{Manager, RunEvent};

mod commands;
mod config;
mod error;

use commands::overlay::OverlayHandle;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    commands::logging::init_console_logger();

    let mut builder = tauri::Builder::default().plugin(tauri_plugin_store::Builder::default().build());

    #[cfg(desktop)]
    {
        builder = builder.plugin(tauri_plugin_global_shortcut::Builder::new().build());
    }

    let app = builder
        .manage(OverlayHandle::new())
        .invoke_handler(tauri::generate_handler![
            // Overlay commands
            commands::overlay::commands::install_hooks,
            commands::overlay::commands::show_overlay,
            commands::overlay::commands::hide_overlay,
            commands::overlay::commands::toggle_overlay,
            commands::overlay::commands::release_overlay,
            commands::overlay::commands::get_overlay_status,
            // Config commands
            config::overlay::get_overlay_config,
            config::overlay::set_overlay_config,
            commands::shortcut::update_overlay_shortcut,
            // Logging commands
            commands::logging::write_log,
            commands::logging::write_logs,
            commands::logging::get_log_dir,
            commands::logging::get_recent_logs,
        ])
        .setup(|app| {
            let handle = app.handle();

            if let Err(e) = commands::logging::init_logging(handle) {
                log::warn!("[setup] File logging unavailable: {}", e);
            }

            match config::overlay::load(handle) {
                Ok(config) => log::info!("[setup] Loaded overlay config: {:?}", config),
                Err(e) => log::warn!("[setup] Using default overlay config: {}", e),
            }

            // A bad accelerator must not keep the app from starting.
            if let Err(e) = commands::shortcut::register_toggle_shortcut(handle) {
                log::error!("[setup] {}", e);
            }

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app, event| {
        if let RunEvent::Exit = event {
            commands::shortcut::unregister_all(app);
            app.state::<OverlayHandle>().release();
            log::info!("[run] Shutdown complete");
        }
    });
}
