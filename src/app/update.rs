// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! All state mutation happens here, on the UI executor; asynchronous work
//! (the portal permission check, pipeline frames, detection passes) arrives
//! as messages.

use std::time::Instant;

use cosmic::Task;
use tracing::{debug, error, info, warn};

use crate::app::state::{AppModel, ContextPage, Message};
use crate::detect::{CodeAction, DetectedCode};
use crate::fl;
use crate::permission::{PermissionDecision, PermissionState};

impl AppModel {
    /// Main message handler
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::Dismiss => self.handle_dismiss(),

            // ===== Permission =====
            Message::PermissionResolved {
                generation,
                decision,
            } => self.handle_permission_resolved(generation, decision),
            Message::OpenSettings => self.handle_open_settings(),
            Message::DismissError => {
                self.error.dismiss();
                Task::none()
            }

            // ===== Scanning =====
            Message::CameraFrame(frame) => {
                self.frame_serial = self.frame_serial.wrapping_add(1);
                self.current_frame = Some(frame);
                Task::none()
            }
            Message::CodesDetected(codes) => self.handle_codes_detected(codes),
            Message::AnimationTick(now) => {
                self.scan_line_position = self.scanning.position(now);
                Task::none()
            }
            Message::Rescan => self.handle_rescan(),

            // ===== Results =====
            Message::OpenDetected(url) => self.handle_open_detected(url),
            Message::CopyDetected(text) => {
                info!(text_length = text.len(), "Copying decoded text to clipboard");
                cosmic::iced::clipboard::write(text).map(|_: ()| cosmic::Action::App(Message::Noop))
            }

            // ===== Settings =====
            Message::UpdateConfig(config) => {
                let theme_changed = config.app_theme != self.config.app_theme;
                self.config = config;
                if theme_changed {
                    return cosmic::command::set_theme(self.config.app_theme.theme());
                }
                Task::none()
            }

            Message::Noop => Task::none(),
        }
    }

    /// Kick off a permission check for the current scan generation
    ///
    /// Resolutions carry the generation they were started under so a check
    /// outliving a rescan (or the screen) cannot apply a stale decision.
    pub(crate) fn check_permission(&self) -> Task<cosmic::Action<Message>> {
        let generation = self.scan_generation;
        info!(generation, "Checking camera permission");

        Task::perform(crate::permission::check_access(), move |decision| {
            cosmic::Action::App(Message::PermissionResolved {
                generation,
                decision,
            })
        })
    }

    fn handle_permission_resolved(
        &mut self,
        generation: u64,
        decision: PermissionDecision,
    ) -> Task<cosmic::Action<Message>> {
        if generation != self.scan_generation {
            debug!(
                generation,
                current = self.scan_generation,
                "Ignoring stale permission resolution"
            );
            return Task::none();
        }

        self.permission = PermissionState::resolve(decision);
        match decision {
            PermissionDecision::Approved => {
                info!("Camera access granted, starting scan");
                self.scanning.activate();
            }
            PermissionDecision::Denied => {
                warn!("Camera access denied");
                self.error.present(fl!("camera-permission-denied"));
            }
        }
        Task::none()
    }

    fn handle_codes_detected(
        &mut self,
        codes: Vec<DetectedCode>,
    ) -> Task<cosmic::Action<Message>> {
        self.last_detection_time = Some(Instant::now());

        let Some(code) = codes.into_iter().next() else {
            return Task::none();
        };

        info!(content = %code.content, "Code detected");
        let action = code.action();
        self.last_detection = Some(code);
        self.scanning.deactivate();
        self.scan_line_position = 0.0;

        if self.config.open_links_automatically
            && let CodeAction::Url(url) = action
        {
            return self.handle_open_detected(url);
        }
        Task::none()
    }

    fn handle_rescan(&mut self) -> Task<cosmic::Action<Message>> {
        info!("Rescan requested");
        self.last_detection = None;
        self.last_detection_time = None;
        self.error.dismiss();
        self.scanning.deactivate();
        self.scan_line_position = 0.0;

        // A fresh generation invalidates any check still in flight; the
        // portal answers from its permission store without prompting when a
        // decision is already on record.
        self.scan_generation = self.scan_generation.wrapping_add(1);
        self.permission = PermissionState::Idle;
        self.check_permission()
    }

    fn handle_dismiss(&self) -> Task<cosmic::Action<Message>> {
        info!("Scanner dismissed");
        if let Some(id) = self.core.main_window_id() {
            return cosmic::iced::window::close(id);
        }
        Task::none()
    }

    fn handle_open_settings(&mut self) -> Task<cosmic::Action<Message>> {
        self.error.dismiss();
        info!("Opening system settings for camera access");

        // The privacy page covers camera access; fall back to the settings
        // front page for older cosmic-settings versions.
        let result = std::process::Command::new("cosmic-settings")
            .arg("privacy")
            .spawn()
            .or_else(|_| std::process::Command::new("cosmic-settings").spawn());
        if let Err(e) = result {
            error!(error = %e, "Failed to open system settings");
        }
        Task::none()
    }

    fn handle_open_detected(&self, url: String) -> Task<cosmic::Action<Message>> {
        info!(url = %url, "Opening URL from decoded code");
        match open::that_detached(&url) {
            Ok(()) => {}
            Err(err) => {
                error!(url = %url, error = %err, "Failed to open URL");
            }
        }
        Task::none()
    }

    fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        match open::that_detached(&url) {
            Ok(()) => {}
            Err(err) => {
                error!(url = %url, error = %err, "Failed to open URL");
            }
        }
        Task::none()
    }

    fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }
}
