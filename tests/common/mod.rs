//! Common test utilities for the portal integration tests

use gradify::config::PortalConfig;

/// Stub dossier document matching the portal's markup: the identity table
/// sits in the first top-level div, the grades table carries the
/// `table table-bordered` classification. Several cells embed line breaks
/// and runs of spaces on purpose.
#[allow(dead_code)]
pub const GRADE_SHEET_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Dossier etudiant</title></head>
<body>
<div id="entete">
  <table>
    <tr><th>N. Apogee</th><td>12345</td></tr>
    <tr><th>Nom et Prenom</th><td>EL ALAMI
        AHMED</td></tr>
    <tr><th>Date de naissance</th><td>17/03/2003</td></tr>
  </table>
</div>
<div id="resultats">
  <table class="table table-bordered">
    <tr><th>Module</th><th>Note</th><th>Resultat</th></tr>
    <tr><td>Analyse   1</td><td>14.50</td><td>V</td></tr>
    <tr><td>Algebre
        lineaire</td><td>09.75</td><td>R</td></tr>
    <tr></tr>
  </table>
</div>
</body>
</html>"#;

/// Portal configuration pointed at a mock server, with short timeouts so
/// failure-path tests stay fast
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> PortalConfig {
    let mut config = PortalConfig::default();
    config.base_url = base_url.to_string();
    config.probe_timeout_secs = 1;
    config.finalize_timeout_secs = 2;
    config.accept_invalid_certs = false;
    config
}

/// The expected normalized rows of the stub's identity table
#[allow(dead_code)]
pub fn expected_info_rows() -> Vec<Vec<String>> {
    vec![
        vec!["N. Apogee".to_string(), "12345".to_string()],
        vec!["Nom et Prenom".to_string(), "EL ALAMI AHMED".to_string()],
        vec!["Date de naissance".to_string(), "17/03/2003".to_string()],
    ]
}

/// The expected normalized rows of the stub's grades table
#[allow(dead_code)]
pub fn expected_grade_rows() -> Vec<Vec<String>> {
    vec![
        vec!["Module".to_string(), "Note".to_string(), "Resultat".to_string()],
        vec!["Analyse 1".to_string(), "14.50".to_string(), "V".to_string()],
        vec!["Algebre lineaire".to_string(), "09.75".to_string(), "R".to_string()],
    ]
}

/// A 127.0.0.1 URL with a port nothing listens on, for transport-failure
/// tests
#[allow(dead_code)]
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
