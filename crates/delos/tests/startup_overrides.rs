//! Integration tests for deferred resolution and start-up overrides.

use std::sync::Arc;
use std::thread;

use delos::converter::ResolvedEndpoint;
use delos::prelude::*;

fn index() -> TypeIndex {
    TypeIndex::from_declarations([
        TypeDeclaration::new("com.acme.Region", TypeCategory::Enum)
            .with_member(MemberDeclaration::static_method(VALUE_OF, [STRING_TYPE])),
        TypeDeclaration::new("com.acme.Instant", TypeCategory::Plain)
            .with_member(MemberDeclaration::static_method("parse", [STRING_TYPE])),
    ])
    .unwrap()
}

fn invokers() -> MemberInvokers {
    let mut invokers = MemberInvokers::new();
    invokers.factory("com.acme.Region", VALUE_OF, |raw| match raw {
        "EU" | "US" => Ok(TypedValue::object("com.acme.Region", raw.to_string())),
        _ => Err(ConversionError::rejected("com.acme.Region", "no such region")),
    });
    invokers
}

fn reports() -> EndpointDescriptor {
    EndpointDescriptor::new("Reports#since")
        .with_parameter(
            ParameterDescriptor::new("since", ParameterSource::Query, "com.acme.Instant")
                .runtime_resolvable(),
        )
        .with_parameter(
            ParameterDescriptor::new("region", ParameterSource::Query, "com.acme.Region")
                .runtime_resolvable(),
        )
        .with_parameter(ParameterDescriptor::new("limit", ParameterSource::Query, "int"))
}

fn build(endpoint: &EndpointDescriptor) -> (ConverterDeployment, ResolvedEndpoint) {
    let mut indexer = EndpointIndexer::new(ConverterResolver::new(index(), DispatchEmitter::new(invokers())));
    let resolved = indexer.index(endpoint).unwrap();
    let artifacts = indexer.into_resolver().into_emitter().into_artifacts();
    (ConverterDeployment::new(artifacts), resolved)
}

fn epoch_seconds() -> SharedConverter {
    Arc::new(FnConverter::new("com.acme.Instant", |raw| {
        raw.parse::<u64>()
            .map(|secs| TypedValue::object("com.acme.Instant", secs))
            .map_err(|e| ConversionError::malformed("com.acme.Instant", raw, e.to_string()))
    }))
}

fn lowercase_region() -> SharedConverter {
    Arc::new(FnConverter::new("com.acme.Region", |raw| {
        Ok(TypedValue::object("com.acme.Region", raw.to_ascii_lowercase()))
    }))
}

/// An unconvertible deferred type builds, then fails only at first use.
#[test]
fn test_deferred_latent_failure() {
    let (deployment, resolved) = build(&reports());
    assert_eq!(
        resolved.parameter("since").unwrap().strategy,
        Some(ConversionStrategy::Deferred(None))
    );

    deployment.start();
    let bindings = deployment.bind_endpoint(&resolved).unwrap();
    let since = bindings.get("since").unwrap();

    // absent values never touch the converter
    assert_eq!(since.bind(&[]).unwrap(), BoundValue::Single(None));

    let err = since.bind(&["1700000000"]).unwrap_err();
    assert!(matches!(err, ConversionError::NoConverter { .. }));
    assert_eq!(err.status_code().as_u16(), 400);

    // other parameters of the same endpoint are unaffected
    let limit = bindings.get("limit").unwrap().bind(&["10"]).unwrap();
    assert_eq!(limit, BoundValue::Single(Some(TypedValue::Int(10))));
}

/// A start-up override cures the latent failure.
#[test]
fn test_override_cures_latent_failure() {
    let (deployment, resolved) = build(&reports());
    deployment.register_override("com.acme.Instant", epoch_seconds()).unwrap();
    deployment.start();

    let bindings = deployment.bind_endpoint(&resolved).unwrap();
    let BoundValue::Single(Some(value)) = bindings.get("since").unwrap().bind(&["1700000000"]).unwrap() else {
        panic!("expected a converted value");
    };
    assert_eq!(value.downcast_ref::<u64>(), Some(&1_700_000_000));
}

/// An override wins exclusively over the synthesized converter.
#[test]
fn test_override_precedence() {
    let (deployment, resolved) = build(&reports());
    deployment.register_override("com.acme.Region", lowercase_region()).unwrap();
    deployment.start();

    let bindings = deployment.bind_endpoint(&resolved).unwrap();
    let region = bindings.get("region").unwrap();

    // the static valueOf would reject this value
    let BoundValue::Single(Some(value)) = region.bind(&["APAC"]).unwrap() else {
        panic!("expected a converted value");
    };
    assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("apac"));
}

/// Without an override the synthesized converter is used.
#[test]
fn test_static_converter_without_override() {
    let (deployment, resolved) = build(&reports());
    deployment.start();

    let bindings = deployment.bind_endpoint(&resolved).unwrap();
    let region = bindings.get("region").unwrap();

    assert!(region.bind(&["EU"]).is_ok());
    assert!(matches!(
        region.bind(&["APAC"]).unwrap_err(),
        ConversionError::Rejected { .. }
    ));
}

/// Overrides are rejected once serving has started.
#[test]
fn test_overrides_rejected_after_start() {
    let (deployment, resolved) = build(&reports());
    deployment.start();

    let err = deployment
        .register_override("com.acme.Instant", epoch_seconds())
        .unwrap_err();
    assert!(matches!(err, DeploymentError::AlreadyStarted { .. }));

    let bindings = deployment.bind_endpoint(&resolved).unwrap();
    assert!(bindings.get("since").unwrap().bind(&["1"]).is_err());
}

/// Converters are shared across request threads after start-up.
#[test]
fn test_concurrent_conversion_after_start() {
    let (deployment, resolved) = build(&reports());
    deployment.register_override("com.acme.Instant", epoch_seconds()).unwrap();
    deployment.start();

    let bindings = Arc::new(deployment.bind_endpoint(&resolved).unwrap());

    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            let bindings = Arc::clone(&bindings);
            thread::spawn(move || {
                let raw = i.to_string();
                let since = bindings.get("since").unwrap();
                since.bind(&[raw.as_str()]).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let BoundValue::Single(Some(value)) = handle.join().unwrap() else {
            panic!("expected a converted value");
        };
        assert_eq!(value.downcast_ref::<u64>(), Some(&(i as u64)));
    }
}

/// `runtime_converters` in configuration defers every site.
#[test]
fn test_runtime_converters_from_config() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("delos.toml");
    std::fs::write(&path, "[converters]\nruntime_converters = true\n")?;

    let config = ConfigLoader::new().with_file(&path)?.load()?;

    let endpoint = EndpointDescriptor::new("Reports#count")
        .with_parameter(ParameterDescriptor::new("since", ParameterSource::Query, "com.acme.Instant"));

    let mut indexer = EndpointIndexer::new(
        ConverterResolver::new(index(), DispatchEmitter::new(invokers()))
            .with_naming(config.converters.naming()),
    )
    .with_runtime_converters(config.converters.runtime_converters);

    let resolved = indexer.index(&endpoint)?;
    assert_eq!(
        resolved.parameters[0].strategy,
        Some(ConversionStrategy::Deferred(None))
    );
    Ok(())
}
