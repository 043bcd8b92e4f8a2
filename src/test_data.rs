#[cfg(test)]
pub const STORY_JSON: &str = r#"{
  "id": 1,
  "title": "Sin buscarlo",
  "type": "relato",
  "slug": "sin-buscarlo",
  "date": "2024-03-15",
  "excerpt": "Una historia que llegó sin buscarla.",
  "image": "images/sin-buscarlo.jpg",
  "content": "Primer párrafo.\n\nSegundo párrafo con **fuerza**."
}"#;

#[cfg(test)]
pub const POEM_JSON: &str = r#"{
  "id": 100,
  "title": "Canción del agua",
  "type": "poesia",
  "date": "2024-04-02",
  "excerpt": "Versos de río.",
  "image": "",
  "content": [
    ["El agua canta", "bajo el puente *viejo*"],
    ["y yo la escucho"]
  ]
}"#;

#[cfg(test)]
pub const PRIMARY_DOC: &str = r#"{
  "posts": [
    {"id": 1, "title": "Sin buscarlo", "type": "relato", "slug": "sin-buscarlo", "date": "2024-03-15", "excerpt": "a", "content": "uno"},
    {"id": 2, "title": "Mar de fondo", "type": "relato", "slug": "mar-de-fondo", "date": "2024-01-10", "excerpt": "b", "content": ["dos"]},
    {"id": 3, "title": "Luna", "type": "poesia", "slug": "luna", "date": "2024-02-20", "excerpt": "c", "content": [["tres"]]}
  ]
}"#;

#[cfg(test)]
pub const EMBEDDED_DOC: &str = r#"{
  "posts": [
    {"id": 9, "title": "Antiguo", "type": "relato", "slug": "antiguo", "date": "2020-06-01", "excerpt": "viejo", "content": "texto"}
  ]
}"#;

#[cfg(test)]
pub const INDEX_DOC: &str = r#"{
  "posts": ["cancion-del-agua.json", "perdido.json"],
  "lastUpdated": "2024-04-02T10:00:00.000Z"
}"#;

#[cfg(test)]
pub const INDEX_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head><title>El Rincón Franco</title></head>
<body>
  <main id="posts-list"></main>
  <script id="embedded-posts" type="application/json">
  {"posts": [{"id": 9, "title": "Antiguo", "type": "relato", "slug": "antiguo", "date": "2020-06-01", "excerpt": "viejo", "content": "texto"}]}
  </script>
  <script src="js/main.js"></script>
</body>
</html>"#;
