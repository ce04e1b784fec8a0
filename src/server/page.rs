//! The upload page served at `/`.

/// HTML page with the upload form, the ranked score bars and the report panel.
pub const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>🌾 Rice Disease Classifier (CNN - Deep Learning) 🔬</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #1e293b; }
  main { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
  h1 { text-align: center; }
  .description { text-align: center; line-height: 1.6; }
  .panels { display: flex; flex-wrap: wrap; gap: 1.5rem; margin-top: 1.5rem; }
  .panel { flex: 1 1 380px; background: #fff; border: 1px solid #e2e8f0; border-radius: 10px; padding: 1rem; }
  .panel h2 { font-size: 1rem; margin-top: 0; }
  #preview { max-height: 300px; max-width: 100%; display: none; margin: 0.5rem 0; }
  button { background: #16a34a; color: #fff; border: 0; border-radius: 6px; padding: 0.6rem 1.2rem; cursor: pointer; }
  .bar { margin: 0.4rem 0; }
  .bar .track { background: #e2e8f0; border-radius: 4px; height: 0.6rem; }
  .bar .fill { background: #16a34a; border-radius: 4px; height: 0.6rem; }
  .bar .label { display: flex; justify-content: space-between; font-size: 0.9rem; }
  #report { white-space: pre-wrap; font-family: ui-monospace, monospace; font-size: 0.9rem; }
</style>
</head>
<body>
<main>
  <h1>🌾 Rice Disease Classifier (CNN - Deep Learning) 🔬</h1>
  <div class="description">
    <p>🚀 <strong>AI-Powered Rice Disease Detection System</strong></p>
    <p>📸 Upload a clear image of a rice leaf to get instant disease diagnosis</p>
    <p>🎯 Detects: Bacterial Blight • Blast • Brown Spot • Tungro</p>
    <p>⚡ Powered by Deep Learning with 98.9% accuracy</p>
  </div>
  <div class="panels">
    <section class="panel">
      <h2>📷 Upload Rice Leaf Image</h2>
      <form id="upload">
        <input type="file" id="image" name="image" accept="image/*">
        <img id="preview" alt="">
        <p><button type="submit">Submit</button></p>
      </form>
    </section>
    <section class="panel">
      <h2>🎯 Disease Predictions</h2>
      <div id="bars"></div>
      <h2>📋 Detailed Analysis</h2>
      <div id="report"></div>
    </section>
  </div>
</main>
<script>
  const input = document.getElementById("image");
  const preview = document.getElementById("preview");
  const bars = document.getElementById("bars");
  const report = document.getElementById("report");

  input.addEventListener("change", () => {
    const file = input.files[0];
    if (file) {
      preview.src = URL.createObjectURL(file);
      preview.style.display = "block";
    } else {
      preview.style.display = "none";
    }
  });

  function renderBars(scores) {
    bars.replaceChildren();
    if (!scores) return;
    Object.entries(scores)
      .sort((a, b) => b[1] - a[1])
      .slice(0, 4)
      .forEach(([label, score]) => {
        const pct = (score * 100).toFixed(1);
        const bar = document.createElement("div");
        bar.className = "bar";
        bar.innerHTML = '<div class="label"><span></span><span></span></div>' +
          '<div class="track"><div class="fill"></div></div>';
        bar.querySelector(".label span:first-child").textContent = label;
        bar.querySelector(".label span:last-child").textContent = pct + "%";
        bar.querySelector(".fill").style.width = Math.max(0, Math.min(100, pct)) + "%";
        bars.appendChild(bar);
      });
  }

  document.getElementById("upload").addEventListener("submit", async (event) => {
    event.preventDefault();
    const data = new FormData();
    if (input.files[0]) data.append("image", input.files[0]);
    report.textContent = "…";
    try {
      const response = await fetch("/predict", { method: "POST", body: data });
      const body = await response.json();
      if (!response.ok) {
        renderBars(null);
        report.textContent = "Error: " + (body.error ? body.error.message : response.statusText);
        return;
      }
      renderBars(body.scores);
      report.textContent = body.report;
    } catch (err) {
      renderBars(null);
      report.textContent = "Error: " + err;
    }
  });
</script>
</body>
</html>
"##;
