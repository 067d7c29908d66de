//! Swift: module imports, resolved to a same-named file or package target

use super::{capture_all, matches, LanguageStrategy};
use crate::paths::FileIndex;
use depflow_core::Language;

import_pattern!(
    IMPORT,
    r"(?m)^\s*(?:@testable\s+)?import\s+(?:(?:class|struct|enum|protocol|func|var|let|typealias)\s+)?([A-Za-z_][\w.]*)"
);

import_pattern!(
    APPLE_FRAMEWORKS,
    r"^(?:Foundation|UIKit|SwiftUI|AppKit|Combine|CoreData|CoreGraphics|CoreLocation|CoreImage|CoreML|MapKit|AVFoundation|AVKit|Photos|PhotosUI|WebKit|StoreKit|GameKit|SpriteKit|SceneKit|ARKit|Metal|MetalKit|HealthKit|CloudKit|UserNotifications|Security|LocalAuthentication|Network|OSLog|os|Darwin|Dispatch|XCTest|Swift|Observation|SwiftData|Charts|WidgetKit|Alamofire|Kingfisher|SnapKit|RxSwift|Quick|Nimble)(?:\.|$)"
);

pub struct SwiftStrategy;

impl LanguageStrategy for SwiftStrategy {
    fn language(&self) -> Language {
        Language::Swift
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let mut specifiers = Vec::new();
        capture_all(&IMPORT, content, &mut specifiers);
        specifiers
    }

    fn is_external(&self, specifier: &str) -> bool {
        matches(&APPLE_FRAMEWORKS, specifier)
    }

    fn resolve(&self, specifier: &str, _importer: &str, files: &FileIndex) -> Option<String> {
        let module = specifier.split('.').next().unwrap_or(specifier);
        files.find_suffix(&format!("{module}.swift")).or_else(|| {
            // SwiftPM target directory
            files.first_in_dir(&format!("Sources/{module}"), |f| f.ends_with(".swift"))
        })
    }
}
