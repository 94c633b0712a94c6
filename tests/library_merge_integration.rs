//! Integration tests for merging library definitions into a running kernel.

mod test_helpers;

use std::sync::Arc;
use std::thread;

use kernel_results::library::domain::{KernelVersion, LibraryDefinitionBuilder};
use kernel_results::library::error::LibraryError;
use kernel_results::library::services::KernelRegistries;
use kernel_results::rendering::domain::{
    ExactRendererHandler, Priority, RendererHandler, TypeDescriptor, Value,
};
use test_helpers::ScriptedHost;

fn exact(class_name: &str) -> Arc<ExactRendererHandler> {
    Arc::new(ExactRendererHandler::new(class_name, format!("show_{class_name}($it)")))
}

// ============================================================================
// Scenario: Libraries loaded one after another keep earlier registrations
// ============================================================================

#[test]
fn sequential_libraries_preserve_priority_and_order() -> eyre::Result<()> {
    let registries = KernelRegistries::new(KernelVersion::parse("1.0")?);
    let host = ScriptedHost::default();

    for (index, tier) in [Priority::LOW, Priority::HIGH, Priority::DEFAULT]
        .into_iter()
        .enumerate()
    {
        let definition = LibraryDefinitionBuilder::new()
            .add_renderer_with_priority(exact(&format!("lib{index}.A")), tier)
            .add_renderer_with_priority(exact(&format!("lib{index}.B")), tier)
            .build();
        registries.merge(&host, definition)?;
    }

    let order: Vec<String> = registries
        .renderers()
        .registered_renderers()
        .iter()
        .filter_map(|entry| {
            entry
                .item
                .as_any()
                .downcast_ref::<ExactRendererHandler>()
                .map(|handler| handler.class_name().to_owned())
        })
        .collect();
    assert_eq!(
        order,
        ["lib1.A", "lib1.B", "lib2.A", "lib2.B", "lib0.A", "lib0.B"]
    );
    Ok(())
}

// ============================================================================
// Scenario: Libraries for newer kernels are refused
// ============================================================================

#[test]
fn newer_library_is_refused_and_older_one_loads() -> eyre::Result<()> {
    let registries = KernelRegistries::new(KernelVersion::parse("0.12.0.5")?);
    let host = ScriptedHost::default();
    let too_new = LibraryDefinitionBuilder::new()
        .set_minimal_kernel_version_str("0.12.1")?
        .add_renderer(exact("new.Plot"))
        .build();
    let supported = LibraryDefinitionBuilder::new()
        .set_minimal_kernel_version_str("0.12.0.5-dev2")?
        .add_renderer(exact("old.Plot"))
        .build();

    let refused = registries.merge(&host, too_new);
    registries.merge(&host, supported)?;

    assert!(matches!(refused, Err(LibraryError::KernelVersionTooLow { .. })));
    assert_eq!(registries.renderers().registered_renderers().len(), 1);
    Ok(())
}

// ============================================================================
// Scenario: Rendering continues while libraries load
// ============================================================================

#[test]
fn rendering_is_safe_during_concurrent_merges() -> eyre::Result<()> {
    let registries = Arc::new(KernelRegistries::new(KernelVersion::parse("1.0")?));
    let point = TypeDescriptor::new("geo.Point").into_shared();
    let value = Value::opaque(Arc::clone(&point), "Point(1, 2)");

    let loader = {
        let shared = Arc::clone(&registries);
        thread::spawn(move || -> eyre::Result<()> {
            let host = ScriptedHost::default();
            for index in 0..50 {
                let definition = LibraryDefinitionBuilder::new()
                    .add_renderer(exact(&format!("lib{index}.Type")))
                    .add_import(format!("lib{index}.*"))
                    .build();
                shared.merge(&host, definition)?;
            }
            Ok(())
        })
    };

    let host = ScriptedHost::default();
    for _ in 0..50 {
        let rendered = registries.renderers().render(&host, value.clone());
        assert_eq!(rendered, value);
        assert_eq!(registries.text_renderers().render(&value), "Point(1, 2)");
    }
    loader.join().expect("loader thread")?;

    assert_eq!(registries.renderers().registered_renderers().len(), 50);
    assert_eq!(registries.imports().len(), 50);
    Ok(())
}
