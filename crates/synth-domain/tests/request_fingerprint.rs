use synth_core::fingerprint_of;
use synth_domain::{F0Curve, Phoneme, SynthesisRequest};

fn req(speedup: Option<u32>) -> SynthesisRequest {
    SynthesisRequest { model: "m1".into(),
                       phonemes: vec![Phoneme { name: "a".into(),
                                                duration: 0.5 }],
                       f0: F0Curve { timestep: 0.01,
                                     values: vec![220.0, 220.0] },
                       speedup }
}

#[test]
fn omitted_default_shares_token_with_explicit_default() {
    let implicit = fingerprint_of(&req(None).with_defaults(10)).unwrap();
    let explicit = fingerprint_of(&req(Some(10)).with_defaults(10)).unwrap();
    assert_eq!(implicit, explicit);
}

#[test]
fn different_speedup_changes_token() {
    let a = fingerprint_of(&req(Some(10))).unwrap();
    let b = fingerprint_of(&req(Some(20))).unwrap();
    assert_ne!(a, b);
}

#[test]
fn key_order_in_body_does_not_matter() {
    let a = SynthesisRequest::from_json(r#"{"model":"m1","speedup":10,"phonemes":[{"name":"a","duration":0.5}],"f0":{"timestep":0.01,"values":[220.0,220.0]}}"#).unwrap();
    let b = SynthesisRequest::from_json(r#"{"f0":{"values":[220.0,220.0],"timestep":0.01},"phonemes":[{"duration":0.5,"name":"a"}],"speedup":10,"model":"m1"}"#).unwrap();
    assert_eq!(fingerprint_of(&a).unwrap(), fingerprint_of(&b).unwrap());
}
