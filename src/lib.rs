// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Triton — Mermaid render service with a browser editor.
//!
//! The service accepts Mermaid source over HTTP, delegates rendering to an external Mermaid
//! renderer and returns SVG. The crate also ships the editor (browser page and [`client::Editor`])
//! that drives it.

pub mod client;
pub mod config;
pub mod render;
pub mod server;
