// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for the COSMIC code scanner
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ScanAnimation)
//! - `preview`: Camera preview surface
//! - `scan_frame`: Corner brackets and scan line overlay
//! - `square_region`: 1:1 aspect ratio container for the scan region
//! - `view`: Scanner screen layout
//! - `update`: Message handling
//!
//! The permission check runs when the screen first appears; once granted,
//! the capture subscription starts the camera and the detection
//! subscription samples frames for QR codes.

mod preview;
pub mod scan_frame;
mod square_region;
mod state;
mod update;
mod view;

use std::sync::Arc;

use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, ErrorState, Message, ScanAnimation};
use tracing::{error, info};

use crate::capture::CapturePipeline;
use crate::config::Config;
use crate::constants::{animation, detection, pipeline};
use crate::detect::{DetectedCode, QrDetector};
use crate::fl;
use crate::permission::PermissionState;

const REPOSITORY: &str = "https://github.com/cosmic-utils/codescan";
const APP_ICON: &[u8] = include_bytes!(
    "../../resources/icons/hicolor/scalable/apps/io.github.cosmic-utils.cosmic-codescan.svg"
);

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic-utils.cosmic-codescan";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Create the about widget
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let config = match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
            Ok(handler) => match Config::get_entry(&handler) {
                Ok(config) => config,
                Err((errors, config)) => {
                    error!(?errors, "Errors loading config");
                    config
                }
            },
            Err(err) => {
                error!(%err, "Failed to create config handler");
                Config::default()
            }
        };

        // Initialize GStreamer early (required before any GStreamer calls)
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            permission: PermissionState::default(),
            scan_generation: 0,
            error: ErrorState::default(),
            scanning: ScanAnimation::default(),
            scan_line_position: 0.0,
            current_frame: None,
            frame_serial: 0,
            last_detection: None,
            last_detection_time: None,
        };

        // The permission check is the screen's on-appear hook; everything
        // scanning-related waits for its resolution.
        let permission_task = app.check_permission();

        (app, permission_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Display the permission-denied alert while it is visible.
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        if !self.error.visible {
            return None;
        }

        let mut dialog = widget::dialog()
            .title(fl!("app-title"))
            .body(self.error.message.clone())
            .secondary_action(
                widget::button::standard(fl!("cancel")).on_press(Message::DismissError),
            );

        // Settings action only for a permission denial
        if self.permission.is_denied() {
            dialog = dialog.primary_action(
                widget::button::suggested(fl!("open-settings")).on_press(Message::OpenSettings),
            );
        }

        Some(dialog.into())
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::StreamExt;

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // Scan line animation ticks, only while sweeping
        let animation_sub = if self.scanning.is_active() {
            cosmic::iced::time::every(animation::TICK).map(Message::AnimationTick)
        } else {
            Subscription::none()
        };

        // Camera capture, gated on the permission grant; restarts per scan
        // generation so a rescan gets a fresh pipeline
        let camera_sub = if self.permission.is_approved() {
            let generation = self.scan_generation;
            Subscription::run_with_id(
                ("camera", generation),
                cosmic::iced::stream::channel(
                    pipeline::FRAME_CHANNEL_CAPACITY,
                    move |mut output| async move {
                        info!(generation, "Camera subscription started");

                        let (sender, mut receiver) = cosmic::iced::futures::channel::mpsc::channel(
                            pipeline::FRAME_CHANNEL_CAPACITY,
                        );

                        let pipeline = match CapturePipeline::new(sender) {
                            Ok(pipeline) => pipeline,
                            Err(e) => {
                                error!(error = %e, "Failed to start capture pipeline");
                                return;
                            }
                        };

                        while let Some(frame) = receiver.next().await {
                            if output.is_closed() {
                                info!("Output channel closed - camera subscription ending");
                                break;
                            }

                            // try_send keeps the pipeline from backing up
                            // behind a busy UI; dropped frames are fine for
                            // a live preview
                            if let Err(e) = output.try_send(Message::CameraFrame(Arc::new(frame)))
                                && e.is_disconnected()
                            {
                                info!("Output channel disconnected - camera subscription ending");
                                break;
                            }
                        }

                        info!("Cleaning up capture pipeline");
                        drop(pipeline);
                    },
                ),
            )
        } else {
            Subscription::none()
        };

        // QR detection over the live feed, at most one pass per sample
        // interval, paused once the sweep stops (a code was found)
        let should_detect = self.scanning.is_active()
            && self
                .last_detection_time
                .map(|t| t.elapsed() >= detection::SAMPLE_INTERVAL)
                .unwrap_or(true);

        let detection_sub = match (should_detect, &self.current_frame) {
            (true, Some(frame)) => {
                let frame = frame.clone();
                Subscription::run_with_id(
                    ("qr_detection", self.frame_serial),
                    cosmic::iced::stream::channel(1, move |mut output| async move {
                        let detector = QrDetector::new();
                        let mut handler = |codes: Vec<DetectedCode>| {
                            let _ = output.try_send(Message::CodesDetected(codes));
                        };
                        detector.detect_into(frame, &mut handler).await;
                    }),
                )
            }
            _ => Subscription::none(),
        };

        // After a denial, re-run the check whenever the window regains focus
        // (the user may have granted access in system settings meanwhile);
        // paused while the alert is still up
        let refocus_sub = if self.permission.is_denied() && !self.error.visible {
            cosmic::iced::event::listen_with(|event, _status, _id| match event {
                cosmic::iced::Event::Window(cosmic::iced::window::Event::Focused) => {
                    Some(Message::Rescan)
                }
                _ => None,
            })
        } else {
            Subscription::none()
        };

        Subscription::batch([
            config_sub,
            animation_sub,
            camera_sub,
            detection_sub,
            refocus_sub,
        ])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
