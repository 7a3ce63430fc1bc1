use super::*;

fn v(s: &str) -> ReleaseVersion {
    ReleaseVersion::parse(s).unwrap()
}

fn request() -> ReleaseRequest {
    ReleaseRequest::default()
}

#[test]
fn test_parse_and_display() {
    let version = v("1.2.3");
    assert_eq!(version.major(), 1);
    assert_eq!(version.minor(), 2);
    assert_eq!(version.patch(), 3);
    assert_eq!(version.to_string(), "1.2.3");
}

#[test]
fn test_parse_rejects_prerelease_and_build() {
    assert!(matches!(
        ReleaseVersion::parse("1.0.0-alpha"),
        Err(CoreError::InvalidVersion { .. })
    ));
    assert!(matches!(
        ReleaseVersion::parse("1.0.0+build.5"),
        Err(CoreError::InvalidVersion { .. })
    ));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(ReleaseVersion::parse("one.two.three").is_err());
    assert!(ReleaseVersion::parse("1.2").is_err());
    assert!(ReleaseVersion::parse("").is_err());
}

#[test]
fn test_ordering_is_semver_precedence() {
    assert!(v("1.10.0") > v("1.9.9"));
    assert!(v("2.0.0") > v("1.99.99"));
    assert!(v("0.0.2") > v("0.0.1"));
    assert_eq!(v("1.2.3"), ReleaseVersion::new(1, 2, 3));
}

#[test]
fn test_first_release_default() {
    let resolved = resolve_version(&request(), None).unwrap();
    assert_eq!(resolved, ReleaseVersion::new(0, 0, 1));
}

#[test]
fn test_first_release_explicit_version() {
    let req = ReleaseRequest {
        version: Some(v("2.0.0")),
        ..request()
    };
    assert_eq!(resolve_version(&req, None).unwrap(), v("2.0.0"));
}

#[test]
fn test_first_release_ignores_bump_flags() {
    let req = ReleaseRequest {
        major: true,
        ..request()
    };
    assert_eq!(resolve_version(&req, None).unwrap(), FIRST_RELEASE);
}

#[test]
fn test_major_wins_over_minor() {
    let req = ReleaseRequest {
        major: true,
        minor: true,
        ..request()
    };
    assert_eq!(resolve_version(&req, Some(&v("1.2.3"))).unwrap(), v("2.0.0"));
}

#[test]
fn test_minor_bump() {
    let req = ReleaseRequest {
        minor: true,
        ..request()
    };
    assert_eq!(resolve_version(&req, Some(&v("1.2.3"))).unwrap(), v("1.3.0"));
}

#[test]
fn test_minor_wins_over_patch() {
    let req = ReleaseRequest {
        minor: true,
        patch: true,
        ..request()
    };
    assert_eq!(resolve_version(&req, Some(&v("1.2.3"))).unwrap(), v("1.3.0"));
}

#[test]
fn test_explicit_patch_bump() {
    let req = ReleaseRequest {
        patch: true,
        ..request()
    };
    assert_eq!(resolve_version(&req, Some(&v("1.2.3"))).unwrap(), v("1.2.4"));
}

#[test]
fn test_no_flags_defaults_to_patch() {
    assert!(request().is_unspecified());
    assert_eq!(
        resolve_version(&request(), Some(&v("1.2.3"))).unwrap(),
        v("1.2.4")
    );
}

#[test]
fn test_explicit_version_must_be_greater() {
    let equal = ReleaseRequest {
        version: Some(v("1.2.3")),
        ..request()
    };
    assert!(matches!(
        resolve_version(&equal, Some(&v("1.2.3"))),
        Err(CoreError::VersionConflict { .. })
    ));

    let lower = ReleaseRequest {
        version: Some(v("1.0.0")),
        ..request()
    };
    assert!(matches!(
        resolve_version(&lower, Some(&v("1.2.3"))),
        Err(CoreError::VersionConflict { .. })
    ));
}

#[test]
fn test_explicit_version_beats_bump_flags() {
    let req = ReleaseRequest {
        version: Some(v("5.0.0")),
        major: true,
        ..request()
    };
    assert_eq!(resolve_version(&req, Some(&v("1.2.3"))).unwrap(), v("5.0.0"));
}

#[test]
fn test_resolution_is_deterministic() {
    let req = ReleaseRequest {
        minor: true,
        ..request()
    };
    let latest = v("3.4.5");
    assert_eq!(
        resolve_version(&req, Some(&latest)).unwrap(),
        resolve_version(&req, Some(&latest)).unwrap()
    );
}

#[test]
fn test_sequence_of_releases_strictly_increases() {
    let mut latest: Option<ReleaseVersion> = None;
    let requests = [
        request(),
        ReleaseRequest {
            minor: true,
            ..request()
        },
        request(),
        ReleaseRequest {
            major: true,
            ..request()
        },
        ReleaseRequest {
            version: Some(v("7.1.0")),
            ..request()
        },
    ];
    for req in &requests {
        let next = resolve_version(req, latest.as_ref()).unwrap();
        if let Some(prev) = &latest {
            assert!(next > *prev, "{next} should be greater than {prev}");
        }
        latest = Some(next);
    }
    assert_eq!(latest, Some(v("7.1.0")));
}

#[test]
fn test_serde_as_string() {
    let version: ReleaseVersion = serde_yaml::from_str("\"1.4.0\"").unwrap();
    assert_eq!(version, v("1.4.0"));
    assert!(serde_yaml::from_str::<ReleaseVersion>("\"1.4.0-rc.1\"").is_err());
}

#[test]
fn test_bump_apply() {
    let base = v("1.2.3");
    assert_eq!(VersionBump::Major.apply(&base).unwrap(), v("2.0.0"));
    assert_eq!(VersionBump::Minor.apply(&base).unwrap(), v("1.3.0"));
    assert_eq!(VersionBump::Patch.apply(&base).unwrap(), v("1.2.4"));
}

#[test]
fn test_bump_at_component_limit_is_an_error() {
    let latest = ReleaseVersion::new(1, 2, u64::MAX);
    let err = resolve_version(&request(), Some(&latest)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidVersion { .. }));
    assert!(err.to_string().contains("patch"), "{err}");

    let latest = ReleaseVersion::new(u64::MAX, 0, 0);
    let major = ReleaseRequest {
        major: true,
        ..request()
    };
    assert!(matches!(
        resolve_version(&major, Some(&latest)),
        Err(CoreError::InvalidVersion { .. })
    ));
    // Other components can still move.
    let minor = ReleaseRequest {
        minor: true,
        ..request()
    };
    assert_eq!(
        resolve_version(&minor, Some(&latest)).unwrap(),
        ReleaseVersion::new(u64::MAX, 1, 0)
    );
}
