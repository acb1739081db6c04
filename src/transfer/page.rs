//! The self-contained browser upload page.

/// Served on `GET /`. The page base64-encodes the chosen file client-side and
/// POSTs it as JSON to `/upload`, so the server only ever deals with text
/// bodies.
pub const UPLOAD_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Send a book</title>
<style>
  body { font-family: sans-serif; max-width: 32em; margin: 4em auto; color: #333; }
  #drop { border: 2px dashed #999; border-radius: 8px; padding: 3em; text-align: center; }
  #drop.hover { border-color: #3a7; background: #f4fbf7; }
  #status { margin-top: 1em; min-height: 1.5em; }
</style>
</head>
<body>
<h1>Send a book to your reader</h1>
<div id="drop">
  <p>Drop a book file here, or</p>
  <input type="file" id="picker">
</div>
<p id="status"></p>
<script>
var drop = document.getElementById('drop');
var status = document.getElementById('status');

function upload(file) {
  status.textContent = 'Uploading ' + file.name + '...';
  var reader = new FileReader();
  reader.onload = function () {
    var data = reader.result.split(',')[1];
    fetch('/upload', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ fileName: file.name, fileData: data })
    }).then(function (resp) {
      status.textContent = resp.ok ? 'Done! Check your reader.' : 'Upload failed (' + resp.status + ').';
    }).catch(function () {
      status.textContent = 'Upload failed: connection error.';
    });
  };
  reader.readAsDataURL(file);
}

document.getElementById('picker').addEventListener('change', function (e) {
  if (e.target.files.length) upload(e.target.files[0]);
});
drop.addEventListener('dragover', function (e) { e.preventDefault(); drop.classList.add('hover'); });
drop.addEventListener('dragleave', function () { drop.classList.remove('hover'); });
drop.addEventListener('drop', function (e) {
  e.preventDefault();
  drop.classList.remove('hover');
  if (e.dataTransfer.files.length) upload(e.dataTransfer.files[0]);
});
</script>
</body>
</html>
"#;
