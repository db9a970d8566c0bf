// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use fontshelf::api;
use fontshelf::app_state::AppState;
use fontshelf::config::ValidatedConfig;
use fontshelf::runtime_paths::RuntimePaths;
use fontshelf::util::TestConfigBuilder;
use fontshelf::util::test_fixtures::TestFixtureRoot;
use serde_json::Value;
use std::sync::Arc;

pub const BOUNDARY: &str = "----fontshelf-test-boundary";

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub app_state: Arc<AppState>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(TestConfigBuilder::new().build())
    }

    pub fn with_upload_limit_mb(max_file_size_mb: u64) -> Self {
        Self::with_config(
            TestConfigBuilder::new()
                .with_max_file_size_mb(max_file_size_mb)
                .build(),
        )
    }

    pub fn with_config(config: ValidatedConfig) -> Self {
        let fixture = TestFixtureRoot::new_unique("api-test-suite").expect("fixture root");
        let runtime_paths = fixture.runtime_paths(&config).expect("runtime paths");
        let config = Arc::new(config);
        let app_state = Arc::new(
            AppState::from_runtime(config.clone(), &runtime_paths).expect("app state"),
        );

        Self {
            fixture,
            config,
            runtime_paths,
            app_state,
        }
    }

    /// Fresh state over the same runtime root, as after a restart.
    pub fn reopen(&self) -> Arc<AppState> {
        Arc::new(
            AppState::from_runtime(self.config.clone(), &self.runtime_paths)
                .expect("app state"),
        )
    }
}

pub fn build_test_app(
    app_state: Arc<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(app_state))
        .configure(api::configure)
        .default_service(web::to(api::not_found))
}

pub fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: font/ttf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(filename: &str, content: &[u8]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/upload")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(filename, content))
}

pub fn read_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("json body")
}

pub fn names(values: &Value) -> Vec<String> {
    values
        .as_array()
        .expect("array")
        .iter()
        .map(|item| {
            item.get("name")
                .and_then(Value::as_str)
                .expect("name")
                .to_string()
        })
        .collect()
}
